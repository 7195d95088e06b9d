use crate::catalog::definition::IntegrationDefinition;
use crate::parameter::{ParameterNode, ParameterTree};
use tracing::debug;

pub mod display;

/// Properties that select the shape instead of being part of it.
const DEFAULT_SKIPPED: [&str; 3] = ["resource", "operation", "authentication"];

/// Turns one integration definition into the parameter tree of a single
/// resource/operation pair.
#[derive(Debug, Clone)]
pub struct SchemaCompiler {
    skipped: Vec<String>,
}

pub struct SchemaCompilerBuilder {
    skipped: Vec<String>,
}

impl SchemaCompilerBuilder {
    pub fn new() -> Self {
        Self {
            skipped: DEFAULT_SKIPPED.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Leaves an additional top-level property out of every compiled shape.
    pub fn skip_property(mut self, name: &str) -> Self {
        if !self.skipped.iter().any(|skipped| skipped == name) {
            self.skipped.push(name.to_string());
        }
        self
    }

    pub fn build(self) -> SchemaCompiler {
        SchemaCompiler {
            skipped: self.skipped,
        }
    }
}

impl Default for SchemaCompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SchemaCompiler {
    fn default() -> Self {
        SchemaCompilerBuilder::new().build()
    }
}

impl SchemaCompiler {
    pub fn builder() -> SchemaCompilerBuilder {
        SchemaCompilerBuilder::new()
    }

    /// Compiles the shape of `resource`/`operation`.
    ///
    /// Properties hidden for this pair, skipped selector properties and properties of an
    /// unmodelled type are left out. Declaration order is kept.
    pub fn compile(
        &self,
        definition: &IntegrationDefinition,
        resource: &str,
        operation: &str,
    ) -> ParameterTree {
        let mut tree = ParameterTree::new();
        for property in &definition.properties {
            if self.skipped.iter().any(|skipped| *skipped == property.name) {
                continue;
            }
            if let Some(options) = &property.display_options {
                if !display::is_visible(options, resource, operation) {
                    debug!(
                        integration = %definition.name,
                        property = %property.name,
                        resource,
                        operation,
                        "Property not shown for this operation"
                    );
                    continue;
                }
            }
            if let Some(node) = ParameterNode::from_definition(property) {
                tree.insert(property.name.clone(), node);
            }
        }
        tree
    }
}
