use super::definition::{IntegrationDefinition, PropertyDefinition, literal_text};
use super::selector::ToolSelector;
use crate::compiler::SchemaCompiler;
use crate::config::AgentConfig;
use crate::error::{CatalogError, LookupError};
use crate::parameter::ParameterTree;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Resource and operation name used when an integration declares none.
pub const DEFAULT_NAME: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Trigger,
    Action,
}

impl NodeType {
    /// Integrations whose name mentions a trigger or a webhook start workflows.
    pub fn classify(integration_name: &str) -> Self {
        let lowered = integration_name.to_lowercase();
        if lowered.contains("trigger") || lowered.contains("webhook") {
            NodeType::Trigger
        } else {
            NodeType::Action
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Trigger => "trigger",
            NodeType::Action => "action",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity and classification of one callable integration operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    pub node_type: NodeType,
    pub integration_name: String,
    pub resource_name: String,
    pub operation_name: String,
    pub operation_description: String,
}

impl NodeMeta {
    /// `action(resource=message, operation=post): Post a message`
    pub fn to_action_string(&self) -> String {
        let mut line = format!(
            "{}(resource={}, operation={})",
            self.node_type, self.resource_name, self.operation_name
        );
        if !self.operation_description.is_empty() {
            line.push_str(&format!(": {}", self.operation_description));
        }
        line
    }
}

/// Operations of one integration, grouped by resource.
pub type ResourceMap = IndexMap<String, IndexMap<String, NodeMeta>>;

/// An allow-listed integration with its resolved operations.
#[derive(Debug, Clone)]
pub struct IntegrationEntry {
    pub name: String,
    pub description: String,
    pub pseudo_node: bool,
    pub resources: ResourceMap,
    pub definition: IntegrationDefinition,
}

/// The resources and operations an integration declares, found by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationSummary {
    pub name: String,
    pub resources: Vec<String>,
    pub operations: Vec<String>,
}

/// The tools offered to the model: every allow-listed integration and the
/// resource/operation pairs it was narrowed to.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    integrations: IndexMap<String, IntegrationEntry>,
    compiler: SchemaCompiler,
}

impl ToolCatalog {
    /// Resolves `definitions` against the allow-list.
    ///
    /// Integrations appear in allow-list order. Several entries naming the same
    /// integration are merged; an entry naming just the integration keeps all of it.
    pub fn resolve(
        definitions: &[IntegrationDefinition],
        allow_list: &[String],
    ) -> Result<Self, CatalogError> {
        let mut selected: IndexMap<String, Vec<ToolSelector>> = IndexMap::new();
        for entry in allow_list {
            let selector: ToolSelector = entry.parse()?;
            selected
                .entry(selector.integration.clone())
                .or_default()
                .push(selector);
        }

        let mut integrations = IndexMap::new();
        for (name, selectors) in selected {
            let Some(definition) = definitions.iter().find(|d| d.short_name() == name) else {
                warn!(integration = %name, "Allow-listed integration not found in catalog");
                continue;
            };
            let resources = narrow(resolve_integration(definition), &selectors);
            if resources.is_empty() {
                warn!(integration = %name, "Allow-list entries matched no operation");
            }
            if definition.pseudo_node {
                info!(integration = %name, "Loaded pseudo node");
            }
            integrations.insert(
                name.clone(),
                IntegrationEntry {
                    name,
                    description: definition.description.clone().unwrap_or_default(),
                    pseudo_node: definition.pseudo_node,
                    resources,
                    definition: definition.clone(),
                },
            );
        }
        info!(count = integrations.len(), "Resolved tool catalog");
        Ok(Self::from_entries(integrations))
    }

    pub(crate) fn from_entries(integrations: IndexMap<String, IntegrationEntry>) -> Self {
        Self {
            integrations,
            compiler: SchemaCompiler::default(),
        }
    }

    /// Reads a catalog JSON file (an array of integration definitions).
    pub fn load_definitions(path: impl AsRef<Path>) -> Result<Vec<IntegrationDefinition>, CatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| CatalogError::JsonParseError(e.to_string()))
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, CatalogError> {
        let definitions = Self::load_definitions(&config.parser.nodes_json_path)?;
        Self::resolve(&definitions, &config.parser.nodes_white_list)
    }

    /// Replaces the compiler used by [`ToolCatalog::compile_shape`].
    pub fn with_compiler(mut self, compiler: SchemaCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn integrations(&self) -> impl Iterator<Item = &IntegrationEntry> {
        self.integrations.values()
    }

    pub fn integration(&self, name: &str) -> Option<&IntegrationEntry> {
        self.integrations.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }

    pub fn lookup(&self, integration: &str, resource: &str, operation: &str) -> Result<&NodeMeta, LookupError> {
        let entry = self
            .integrations
            .get(integration)
            .ok_or_else(|| LookupError::Integration {
                integration: integration.to_string(),
            })?;
        let operations = entry
            .resources
            .get(resource)
            .ok_or_else(|| LookupError::Resource {
                integration: integration.to_string(),
                resource: resource.to_string(),
            })?;
        operations.get(operation).ok_or_else(|| LookupError::Operation {
            integration: integration.to_string(),
            resource: resource.to_string(),
            operation: operation.to_string(),
        })
    }

    /// Compiles a fresh, unset parameter tree for an operation of this catalog.
    pub fn compile_shape(&self, meta: &NodeMeta) -> ParameterTree {
        match self.integrations.get(&meta.integration_name) {
            Some(entry) => self
                .compiler
                .compile(&entry.definition, &meta.resource_name, &meta.operation_name),
            None => ParameterTree::new(),
        }
    }

    /// The numbered tool list shown to the model.
    pub fn describe_tools(&self, config: &AgentConfig) -> String {
        let mut lines = Vec::new();
        for (k, entry) in self.integrations.values().enumerate() {
            let mut description = entry.description.clone();
            if let Some(knowledge) = config.knowledge_for(&entry.name) {
                debug!(integration = %entry.name, "Appending default knowledge");
                description.push_str(knowledge);
            }
            lines.push(format!("{}.integration={}: {}", k + 1, entry.name, description));
            let operations = entry.resources.values().flat_map(IndexMap::values);
            for (j, meta) in operations.enumerate() {
                lines.push(format!("  {}.{}: {}", k + 1, j + 1, meta.to_action_string()));
            }
        }
        lines.join("\n")
    }

    /// Looks an integration up by display name, case-insensitively.
    pub fn search_integration(&self, display_name: &str) -> Option<IntegrationSummary> {
        search_integration(self.integrations.values().map(|e| &e.definition), display_name)
    }
}

/// Looks an integration up by display name among raw definitions, case-insensitively.
pub fn search_integration<'a>(
    definitions: impl IntoIterator<Item = &'a IntegrationDefinition>,
    display_name: &str,
) -> Option<IntegrationSummary> {
    let wanted = display_name.to_lowercase();
    let definition = definitions.into_iter().find(|d| {
        d.display_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase() == wanted)
    })?;
    let choices_of = |selector: &str| -> Vec<String> {
        definition
            .properties
            .iter()
            .filter(|p| p.name == selector)
            .flat_map(|p| p.options.iter().flatten())
            .filter_map(|choice| choice.value.as_ref().map(literal_text))
            .collect()
    };
    Some(IntegrationSummary {
        name: definition.name.clone(),
        resources: choices_of("resource"),
        operations: choices_of("operation"),
    })
}

/// Builds the resource → operation → meta mapping of one integration.
fn resolve_integration(definition: &IntegrationDefinition) -> ResourceMap {
    let integration_name = definition.short_name().to_string();
    let node_type = NodeType::classify(&integration_name);
    let mut resources = ResourceMap::new();

    let declared = definition.properties.iter().find(|p| p.name == "resource");
    match declared {
        Some(property) => {
            for choice in property.options.iter().flatten() {
                resources.insert(choice_value(choice), IndexMap::new());
            }
        }
        None => {
            resources.insert(DEFAULT_NAME.to_string(), IndexMap::new());
        }
    }

    let mut has_operations = false;
    for property in definition.properties.iter().filter(|p| p.name == "operation") {
        let gated: Option<Vec<String>> = property
            .display_options
            .as_ref()
            .and_then(|options| options.show.as_ref())
            .and_then(|show| show.get("resource"))
            .map(|values| values.iter().map(literal_text).collect());
        let targets = gated.unwrap_or_else(|| resources.keys().cloned().collect());

        for target in targets {
            let Some(operations) = resources.get_mut(&target) else {
                warn!(
                    integration = %integration_name,
                    resource = %target,
                    "Operation gated on an undeclared resource; skipped"
                );
                continue;
            };
            for choice in property.options.iter().flatten() {
                let operation_name = choice_value(choice);
                operations.insert(
                    operation_name.clone(),
                    NodeMeta {
                        node_type,
                        integration_name: integration_name.clone(),
                        resource_name: target.clone(),
                        operation_name,
                        operation_description: choice.description.clone().unwrap_or_default(),
                    },
                );
                has_operations = true;
            }
        }
    }

    if !has_operations {
        for (resource_name, operations) in resources.iter_mut() {
            operations.insert(
                DEFAULT_NAME.to_string(),
                NodeMeta {
                    node_type,
                    integration_name: integration_name.clone(),
                    resource_name: resource_name.clone(),
                    operation_name: DEFAULT_NAME.to_string(),
                    operation_description: String::new(),
                },
            );
        }
    }
    resources
}

/// Keeps only what at least one selector admits, dropping emptied resources.
fn narrow(resources: ResourceMap, selectors: &[ToolSelector]) -> ResourceMap {
    if selectors.iter().any(ToolSelector::is_whole_integration) {
        return resources;
    }
    resources
        .into_iter()
        .filter_map(|(resource, operations)| {
            let kept: IndexMap<String, NodeMeta> = operations
                .into_iter()
                .filter(|(operation, _)| selectors.iter().any(|s| s.admits(&resource, operation)))
                .collect();
            (!kept.is_empty()).then_some((resource, kept))
        })
        .collect()
}

fn choice_value(choice: &PropertyDefinition) -> String {
    choice
        .value
        .as_ref()
        .map(literal_text)
        .unwrap_or_else(|| choice.name.clone())
}
