//! The parameter schema tree.
//!
//! A [`ParameterNode`] is one declared input of a catalog operation. Its [`ParameterKind`]
//! is a closed sum type, so construction, validation, description and serialization all
//! match exhaustively over the same set of variants.
//!
//! Nodes hold their own value state. A node is *set* once a parse has succeeded on it
//! since the last [`ParameterNode::refresh`]; unset nodes serialize to nothing.

mod build;
mod describe;
mod parse;
pub mod path;

pub use parse::{EXPRESSION_SCHEMA, ParamError};
pub use path::ParamPath;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// One operation's parameters, keyed by name in declaration order.
pub type ParameterTree = IndexMap<String, ParameterNode>;

/// The catalog type tags that become parameter nodes.
///
/// Tags outside this set (`list`, `json`, `color`, `dateTime`, `multiOptions`,
/// `resourceMapper`, ...) are not modelled and the property is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Options,
    Collection,
    FixedCollection,
    ResourceLocator,
    Notice,
}

impl ParameterType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(ParameterType::String),
            "number" => Some(ParameterType::Number),
            "boolean" => Some(ParameterType::Boolean),
            "options" => Some(ParameterType::Options),
            "collection" => Some(ParameterType::Collection),
            "fixedCollection" => Some(ParameterType::FixedCollection),
            "resourceLocator" => Some(ParameterType::ResourceLocator),
            "notice" => Some(ParameterType::Notice),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Options => "options",
            ParameterType::Collection => "collection",
            ParameterType::FixedCollection => "fixedCollection",
            ParameterType::ResourceLocator => "resourceLocator",
            ParameterType::Notice => "notice",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A scalar slot holds either a typed literal or an `=`-prefixed expression, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue<T> {
    Fixed(T),
    Expression(String),
}

impl<T: Clone + Into<Value>> ScalarValue<T> {
    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Fixed(literal) => literal.clone().into(),
            ScalarValue::Expression(expression) => Value::String(expression.clone()),
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, ScalarValue::Expression(_))
    }
}

/// One allowed value of an options list.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionChoice {
    pub value: String,
    pub description: String,
}

/// The mode picked for a resource locator and the node holding its value.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedMode {
    pub mode: String,
    pub value: Box<ParameterNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    String {
        value: Option<ScalarValue<String>>,
    },
    Number {
        value: Option<ScalarValue<Number>>,
    },
    Boolean {
        value: Option<ScalarValue<bool>>,
    },
    Options {
        choices: Vec<OptionChoice>,
        value: Option<ScalarValue<String>>,
    },
    /// `children` is the per-item template; `instances` holds one parsed copy of it
    /// per input item (exactly one when the node is single-valued).
    Collection {
        children: ParameterTree,
        instances: Option<Vec<ParameterTree>>,
    },
    /// Every group is a `Collection` node sharing this node's multiplicity.
    FixedCollection {
        groups: ParameterTree,
        instances: Option<ParameterTree>,
    },
    ResourceLocator {
        modes: ParameterTree,
        selected: Option<SelectedMode>,
    },
    /// Display-only hint text. Never set, never required.
    Notice {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub name: String,
    pub required: bool,
    pub default: Option<Value>,
    pub description: String,
    pub no_expression: bool,
    /// Rendered sibling-value gating, e.g. `authentication in ["oAuth2"]`.
    /// Shown to the model only; never enforced by parsing.
    pub display_condition: Option<String>,
    pub multiple_values: bool,
    pub kind: ParameterKind,
}

impl ParameterNode {
    pub fn param_type(&self) -> ParameterType {
        match &self.kind {
            ParameterKind::String { .. } => ParameterType::String,
            ParameterKind::Number { .. } => ParameterType::Number,
            ParameterKind::Boolean { .. } => ParameterType::Boolean,
            ParameterKind::Options { .. } => ParameterType::Options,
            ParameterKind::Collection { .. } => ParameterType::Collection,
            ParameterKind::FixedCollection { .. } => ParameterType::FixedCollection,
            ParameterKind::ResourceLocator { .. } => ParameterType::ResourceLocator,
            ParameterKind::Notice { .. } => ParameterType::Notice,
        }
    }

    /// Whether a successful parse has populated this node since the last refresh.
    pub fn data_is_set(&self) -> bool {
        match &self.kind {
            ParameterKind::String { value } => value.is_some(),
            ParameterKind::Number { value } => value.is_some(),
            ParameterKind::Boolean { value } => value.is_some(),
            ParameterKind::Options { value, .. } => value.is_some(),
            ParameterKind::Collection { instances, .. } => instances.is_some(),
            ParameterKind::FixedCollection { instances, .. } => instances.is_some(),
            ParameterKind::ResourceLocator { selected, .. } => selected.is_some(),
            ParameterKind::Notice { .. } => false,
        }
    }

    pub fn is_notice(&self) -> bool {
        matches!(self.kind, ParameterKind::Notice { .. })
    }

    /// Clears this node's value and, for composites, every descendant's.
    pub fn refresh(&mut self) {
        match &mut self.kind {
            ParameterKind::String { value } => *value = None,
            ParameterKind::Number { value } => *value = None,
            ParameterKind::Boolean { value } => *value = None,
            ParameterKind::Options { value, .. } => *value = None,
            ParameterKind::Collection {
                children,
                instances,
            } => {
                *instances = None;
                children.values_mut().for_each(ParameterNode::refresh);
            }
            ParameterKind::FixedCollection { groups, instances } => {
                *instances = None;
                groups.values_mut().for_each(ParameterNode::refresh);
            }
            ParameterKind::ResourceLocator { modes, selected } => {
                *selected = None;
                modes.values_mut().for_each(ParameterNode::refresh);
            }
            ParameterKind::Notice { .. } => {}
        }
    }

    /// The canonical JSON form of the current value, or `None` while unset.
    pub fn to_json(&self) -> Option<Value> {
        if !self.data_is_set() {
            return None;
        }
        match &self.kind {
            ParameterKind::String { value } => value.as_ref().map(ScalarValue::to_json),
            ParameterKind::Number { value } => value.as_ref().map(ScalarValue::to_json),
            ParameterKind::Boolean { value } => value.as_ref().map(ScalarValue::to_json),
            ParameterKind::Options { value, .. } => value.as_ref().map(ScalarValue::to_json),
            ParameterKind::Collection { instances, .. } => {
                let instances = instances.as_ref()?;
                if self.multiple_values {
                    Some(Value::Array(instances.iter().map(tree_to_json).collect()))
                } else {
                    Some(
                        instances
                            .first()
                            .map(tree_to_json)
                            .unwrap_or_else(|| Value::Object(Map::new())),
                    )
                }
            }
            ParameterKind::FixedCollection { instances, .. } => {
                instances.as_ref().map(tree_to_json)
            }
            ParameterKind::ResourceLocator { selected, .. } => {
                let selected = selected.as_ref()?;
                let mut object = Map::new();
                object.insert("mode".to_string(), Value::String(selected.mode.clone()));
                object.insert(
                    "value".to_string(),
                    selected.value.to_json().unwrap_or(Value::Null),
                );
                Some(Value::Object(object))
            }
            ParameterKind::Notice { .. } => None,
        }
    }
}

/// Serializes a tree as an object, leaving out every unset member.
pub fn tree_to_json(tree: &ParameterTree) -> Value {
    Value::Object(
        tree.iter()
            .filter_map(|(name, node)| node.to_json().map(|json| (name.clone(), json)))
            .collect(),
    )
}

/// Refreshes every node of a tree.
pub fn refresh_tree(tree: &mut ParameterTree) {
    tree.values_mut().for_each(ParameterNode::refresh);
}

/// Renders names as a JSON array (`["a","b"]`), the form used in every listing
/// shown back to the model.
pub(crate) fn quoted_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    Value::Array(
        names
            .into_iter()
            .map(|name| Value::String(name.to_string()))
            .collect(),
    )
    .to_string()
}
