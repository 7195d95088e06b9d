use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One integration record from the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationDefinition {
    /// Fully-qualified name, e.g. `n8n-nodes-base.slack`.
    pub name: String,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "pseudoNode")]
    pub pseudo_node: bool,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl IntegrationDefinition {
    /// The short name used everywhere else (`slack` for `n8n-nodes-base.slack`).
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A property record.
///
/// Catalog files reuse the same record shape for several purposes: declared
/// parameters, members of a collection, groups of a fixed collection, modes of a
/// resource locator and the choices of an options list. Every field is optional so a
/// single lenient struct can read all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default, alias = "noDataExpression")]
    pub no_data_expression: bool,
    #[serde(default, alias = "displayOptions")]
    pub display_options: Option<DisplayOptions>,
    #[serde(default, alias = "typeOptions")]
    pub type_options: Option<TypeOptions>,
    /// Choices (for `options`), members (for `collection`) or groups (for `fixedCollection`).
    #[serde(default)]
    pub options: Option<Vec<PropertyDefinition>>,
    /// Members of a fixed-collection group.
    #[serde(default)]
    pub values: Option<Vec<PropertyDefinition>>,
    /// Modes of a resource locator.
    #[serde(default)]
    pub modes: Option<Vec<PropertyDefinition>>,
    /// The literal value of an options choice.
    #[serde(default)]
    pub value: Option<Value>,
}

impl PropertyDefinition {
    pub fn multiple_values(&self) -> bool {
        self.type_options
            .as_ref()
            .map(|options| options.multiple_values)
            .unwrap_or(false)
    }
}

/// Sibling-value gating attached to a property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default)]
    pub show: Option<IndexMap<String, Vec<Value>>>,
    #[serde(default)]
    pub hide: Option<IndexMap<String, Vec<Value>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeOptions {
    #[serde(default, alias = "multipleValues")]
    pub multiple_values: bool,
}

/// Renders a catalog literal as plain text: strings without quotes, anything else as JSON.
pub fn literal_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
