use super::{OptionChoice, ParameterKind, ParameterNode, ParameterTree, ParameterType};
use crate::catalog::definition::{PropertyDefinition, literal_text};
use crate::compiler::display::condition_text;
use serde_json::Value;
use tracing::{debug, warn};

impl ParameterNode {
    /// Builds the node for a property record, dispatching on its type tag.
    ///
    /// Returns `None` for unmodelled tags and for malformed composites so that one odd
    /// property never spoils the rest of an operation's shape.
    pub fn from_definition(definition: &PropertyDefinition) -> Option<ParameterNode> {
        let Some(param_type) = ParameterType::from_tag(&definition.type_tag) else {
            debug!(
                property = %definition.name,
                type_tag = %definition.type_tag,
                "Dropping property with unsupported type"
            );
            return None;
        };

        let kind = match param_type {
            ParameterType::String => ParameterKind::String { value: None },
            ParameterType::Number => ParameterKind::Number { value: None },
            ParameterType::Boolean => ParameterKind::Boolean { value: None },
            ParameterType::Options => ParameterKind::Options {
                choices: definition
                    .options
                    .iter()
                    .flatten()
                    .map(option_choice)
                    .collect(),
                value: None,
            },
            ParameterType::Collection => {
                let Some(members) = &definition.options else {
                    warn!(property = %definition.name, "Collection declares no options; dropped");
                    return None;
                };
                ParameterKind::Collection {
                    children: build_tree(members),
                    instances: None,
                }
            }
            ParameterType::FixedCollection => {
                let Some(groups) = &definition.options else {
                    warn!(property = %definition.name, "Fixed collection declares no groups; dropped");
                    return None;
                };
                let multiple_values = definition.multiple_values();
                ParameterKind::FixedCollection {
                    groups: groups
                        .iter()
                        .filter_map(|group| {
                            fixed_collection_group(group, multiple_values)
                                .map(|node| (node.name.clone(), node))
                        })
                        .collect(),
                    instances: None,
                }
            }
            ParameterType::ResourceLocator => {
                let Some(modes) = &definition.modes else {
                    warn!(property = %definition.name, "Resource locator declares no modes; dropped");
                    return None;
                };
                ParameterKind::ResourceLocator {
                    modes: build_tree(modes),
                    selected: None,
                }
            }
            ParameterType::Notice => ParameterKind::Notice {
                text: definition.display_name.clone().unwrap_or_default(),
            },
        };

        let multiple_values = definition.multiple_values();
        let default = match (&kind, &definition.default) {
            (ParameterKind::Collection { .. }, Some(Value::Object(map))) if multiple_values => {
                Some(Value::Array(vec![Value::Object(map.clone())]))
            }
            (_, default) => default.clone(),
        };

        Some(ParameterNode {
            name: definition.name.clone(),
            required: definition.required,
            default,
            description: assemble_description(definition),
            no_expression: definition.no_data_expression,
            display_condition: definition.display_options.as_ref().and_then(condition_text),
            multiple_values,
            kind,
        })
    }
}

/// Builds the nodes of a property list, skipping the ones that yield nothing.
pub(crate) fn build_tree(definitions: &[PropertyDefinition]) -> ParameterTree {
    definitions
        .iter()
        .filter_map(|definition| {
            ParameterNode::from_definition(definition).map(|node| (definition.name.clone(), node))
        })
        .collect()
}

/// `displayName`, then `. description`, then `(placeholder)`.
fn assemble_description(definition: &PropertyDefinition) -> String {
    let mut description = definition.display_name.clone().unwrap_or_default();
    if let Some(extra) = &definition.description {
        description.push_str(". ");
        description.push_str(extra);
    }
    if let Some(placeholder) = &definition.placeholder {
        description.push_str(&format!("({})", placeholder));
    }
    description
}

fn option_choice(choice: &PropertyDefinition) -> OptionChoice {
    let value = choice
        .value
        .as_ref()
        .map(literal_text)
        .unwrap_or_else(|| choice.name.clone());
    let mut description = choice.name.clone();
    if let Some(extra) = &choice.description {
        description.push_str(". ");
        description.push_str(extra);
    }
    OptionChoice { value, description }
}

/// A fixed-collection group is a collection whose members come from `values` and whose
/// multiplicity is inherited from the owning fixed collection.
fn fixed_collection_group(group: &PropertyDefinition, multiple_values: bool) -> Option<ParameterNode> {
    let Some(members) = &group.values else {
        warn!(group = %group.name, "Fixed collection group declares no values; dropped");
        return None;
    };
    let default = match &group.default {
        Some(Value::Object(map)) if multiple_values => {
            Some(Value::Array(vec![Value::Object(map.clone())]))
        }
        other => other.clone(),
    };
    Some(ParameterNode {
        name: group.name.clone(),
        required: group.required,
        default,
        description: assemble_description(group),
        no_expression: group.no_data_expression,
        display_condition: None,
        multiple_values,
        kind: ParameterKind::Collection {
            children: build_tree(members),
            instances: None,
        },
    })
}
