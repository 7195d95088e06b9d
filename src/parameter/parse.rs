use super::{
    ParamPath, ParameterKind, ParameterNode, ParameterTree, ScalarValue, SelectedMode, quoted_list,
};
use crate::status::ToolCallStatus;
use itertools::Itertools;
use serde_json::Value;
use thiserror::Error;

/// The expression shape advertised to the model whenever expressions are accepted.
pub const EXPRESSION_SCHEMA: &str = r#"str("=.*($json\..*)\.*")"#;

/// A rejected parameter value: the status reported to the model and a message naming
/// the offending path and what would have been accepted.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{status}: {message}")]
pub struct ParamError {
    pub status: ToolCallStatus,
    pub message: String,
}

impl ParamError {
    pub fn new(status: ToolCallStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn type_error(message: impl Into<String>) -> Self {
        Self::new(ToolCallStatus::ParamTypeError, message)
    }

    fn unsupported_expression(path: &ParamPath) -> Self {
        Self::new(
            ToolCallStatus::UnsupportedExpression,
            format!("{} don't support expression", path),
        )
    }
}

type Parsed = Result<(ParameterKind, String), ParamError>;

impl ParameterNode {
    /// Validates `raw` against this node as a top-level parameter and stores it.
    ///
    /// The node is replaced only when the whole value is accepted; on failure it keeps
    /// whatever state it had.
    pub fn parse_value(&mut self, raw: &Value) -> (ToolCallStatus, String) {
        let path = ParamPath::root(&self.name);
        self.parse_value_at(raw, &path)
    }

    pub fn parse_value_at(&mut self, raw: &Value, path: &ParamPath) -> (ToolCallStatus, String) {
        match self.parsed(raw, path) {
            Ok((node, message)) => {
                *self = node;
                (ToolCallStatus::ToolCallSuccess, message)
            }
            Err(error) => (error.status, error.message),
        }
    }

    /// Pure form of [`ParameterNode::parse_value_at`]: returns a new node holding the
    /// parsed value and leaves `self` untouched.
    pub fn parsed(&self, raw: &Value, path: &ParamPath) -> Result<(ParameterNode, String), ParamError> {
        let (kind, message) = match &self.kind {
            ParameterKind::String { .. } => self.parse_string(raw, path)?,
            ParameterKind::Number { .. } => self.parse_number(raw, path)?,
            ParameterKind::Boolean { .. } => self.parse_boolean(raw, path)?,
            ParameterKind::Options { choices, .. } => {
                let accepted: Vec<&str> = choices.iter().map(|c| c.value.as_str()).collect();
                let value = self.parse_option(raw, path, &accepted)?;
                let message = format!(
                    "{} parsed as {}",
                    path,
                    if value.is_expression() { "expression" } else { "normal-string" }
                );
                (
                    ParameterKind::Options {
                        choices: choices.clone(),
                        value: Some(value),
                    },
                    message,
                )
            }
            ParameterKind::Collection { children, .. } => self.parse_collection(raw, path, children)?,
            ParameterKind::FixedCollection { groups, .. } => {
                self.parse_fixed_collection(raw, path, groups)?
            }
            ParameterKind::ResourceLocator { modes, .. } => {
                self.parse_resource_locator(raw, path, modes)?
            }
            ParameterKind::Notice { .. } => {
                return Err(ParamError::type_error(format!(
                    "{} is a notice and takes no value",
                    path
                )));
            }
        };
        Ok((self.with_kind(kind), message))
    }

    fn with_kind(&self, kind: ParameterKind) -> ParameterNode {
        ParameterNode {
            name: self.name.clone(),
            required: self.required,
            default: self.default.clone(),
            description: self.description.clone(),
            no_expression: self.no_expression,
            display_condition: self.display_condition.clone(),
            multiple_values: self.multiple_values,
            kind,
        }
    }

    /// The accepted-type list of a type error, with the expression schema appended
    /// when this node accepts expressions.
    fn accepted_types(&self, literals: &[&str]) -> String {
        let mut accepted: Vec<&str> = literals.to_vec();
        if !self.no_expression {
            accepted.push(EXPRESSION_SCHEMA);
        }
        format!("[{}]", accepted.iter().join(", "))
    }

    fn parse_string(&self, raw: &Value, path: &ParamPath) -> Parsed {
        let Value::String(text) = raw else {
            return Err(ParamError::type_error(format!(
                "{} can only be parsed as {}, got {}",
                path,
                self.accepted_types(&["str"]),
                raw
            )));
        };
        let text = strip_quotes(text);
        if text.starts_with('=') {
            if self.no_expression {
                return Err(ParamError::unsupported_expression(path));
            }
            return Ok((
                ParameterKind::String {
                    value: Some(ScalarValue::Expression(text.to_string())),
                },
                format!("{} parsed as expression", path),
            ));
        }
        Ok((
            ParameterKind::String {
                value: Some(ScalarValue::Fixed(text.to_string())),
            },
            format!("{} parsed as normal-string", path),
        ))
    }

    fn parse_number(&self, raw: &Value, path: &ParamPath) -> Parsed {
        match raw {
            Value::Number(number) => Ok((
                ParameterKind::Number {
                    value: Some(ScalarValue::Fixed(number.clone())),
                },
                format!("{} parsed as fixed_value", path),
            )),
            Value::String(text) => {
                let expression = self.scalar_expression(text, path)?;
                Ok((
                    ParameterKind::Number {
                        value: Some(expression),
                    },
                    format!("{} parsed as expression", path),
                ))
            }
            other => Err(ParamError::type_error(format!(
                "{} can only be parsed as {}, got {}",
                path,
                self.accepted_types(&["int", "float"]),
                other
            ))),
        }
    }

    fn parse_boolean(&self, raw: &Value, path: &ParamPath) -> Parsed {
        match raw {
            Value::Bool(flag) => Ok((
                ParameterKind::Boolean {
                    value: Some(ScalarValue::Fixed(*flag)),
                },
                format!("{} parsed as fixed_value", path),
            )),
            Value::String(text) => {
                let expression = self.scalar_expression(text, path)?;
                Ok((
                    ParameterKind::Boolean {
                        value: Some(expression),
                    },
                    format!("{} parsed as expression", path),
                ))
            }
            other => Err(ParamError::type_error(format!(
                "{} can only be parsed as {}, got {}",
                path,
                self.accepted_types(&["bool"]),
                other
            ))),
        }
    }

    /// A string given to a typed scalar must be an expression.
    fn scalar_expression<T>(&self, text: &str, path: &ParamPath) -> Result<ScalarValue<T>, ParamError> {
        let text = strip_quotes(text);
        if self.no_expression {
            return Err(ParamError::unsupported_expression(path));
        }
        if !text.starts_with('=') {
            return Err(ParamError::new(
                ToolCallStatus::ExpressionError,
                format!("{} doesn't have a expression schema: {}", path, EXPRESSION_SCHEMA),
            ));
        }
        Ok(ScalarValue::Expression(text.to_string()))
    }

    fn parse_option(
        &self,
        raw: &Value,
        path: &ParamPath,
        accepted: &[&str],
    ) -> Result<ScalarValue<String>, ParamError> {
        let Value::String(text) = raw else {
            return Err(ParamError::type_error(format!(
                "{} can only be parsed as enum[str] in {}, got {}",
                path,
                quoted_list(accepted.iter().copied()),
                raw
            )));
        };
        let text = strip_quotes(text);
        if text.starts_with('=') {
            if self.no_expression {
                return Err(ParamError::unsupported_expression(path));
            }
            return Ok(ScalarValue::Expression(text.to_string()));
        }
        if accepted.contains(&text) {
            return Ok(ScalarValue::Fixed(text.to_string()));
        }
        if text.contains(',') {
            return Err(ParamError::type_error(format!(
                "{} doesn't support multiple values (split by ',')",
                path
            )));
        }
        Err(ParamError::type_error(format!(
            "{} should be one of {}, found \"{}\"",
            path,
            quoted_list(accepted.iter().copied()),
            text
        )))
    }

    fn parse_collection(&self, raw: &Value, path: &ParamPath, children: &ParameterTree) -> Parsed {
        match raw {
            Value::Array(items) => {
                if !self.multiple_values {
                    return Err(ParamError::type_error(format!(
                        "{} can only be parsed as dict, got {}",
                        path, raw
                    )));
                }
                let instances = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| self.parse_member_map(item, path, children, Some(index)))
                    .collect::<Result<Vec<_>, _>>()?;
                let message = format!("{} parsed as list with {} items", path, instances.len());
                Ok((
                    ParameterKind::Collection {
                        children: children.clone(),
                        instances: Some(instances),
                    },
                    message,
                ))
            }
            Value::Object(_) => {
                if self.multiple_values {
                    return Err(ParamError::type_error(format!(
                        "{} can only be parsed as list[dict], got {}",
                        path, raw
                    )));
                }
                let instance = self.parse_member_map(raw, path, children, None)?;
                Ok((
                    ParameterKind::Collection {
                        children: children.clone(),
                        instances: Some(vec![instance]),
                    },
                    format!("{} parsed as dict", path),
                ))
            }
            Value::String(_) => Err(ParamError::type_error(format!(
                "{} doesn't support expression now",
                path
            ))),
            other => Err(ParamError::type_error(format!(
                "{} can only be parsed as {}, got {}",
                path,
                if self.multiple_values { "list[dict]" } else { "dict" },
                other
            ))),
        }
    }

    /// Parses one object of a collection input into a copy of the member template.
    fn parse_member_map(
        &self,
        raw: &Value,
        path: &ParamPath,
        children: &ParameterTree,
        index: Option<usize>,
    ) -> Result<ParameterTree, ParamError> {
        let item_name = match index {
            Some(index) => path.indexed(index),
            None => path.to_string(),
        };
        let Value::Object(members) = raw else {
            return Err(ParamError::type_error(format!(
                "{} can only be parsed as dict, got {}",
                item_name, raw
            )));
        };

        let mut instance = ParameterTree::new();
        for (key, value) in members {
            let Some(template) = children.get(key) else {
                return Err(ParamError::new(
                    ToolCallStatus::UndefinedParam,
                    format!(
                        "Undefined property \"{}\" for {}, supported properties: {}",
                        key,
                        item_name,
                        quoted_list(children.keys().map(String::as_str))
                    ),
                ));
            };
            let member_path = path.member(key, self.multiple_values);
            let (member, _) = template.parsed(value, &member_path)?;
            instance.insert(key.clone(), member);
        }
        Ok(instance)
    }

    fn parse_fixed_collection(&self, raw: &Value, path: &ParamPath, groups: &ParameterTree) -> Parsed {
        let Value::Object(entries) = raw else {
            let expected = if self.multiple_values {
                "dict[str,list[dict[str,any]]]"
            } else {
                "dict[str,dict[str,any]]"
            };
            return Err(ParamError::type_error(format!(
                "{} can only be parsed as {}, got {}",
                path, expected, raw
            )));
        };

        let mut instances = ParameterTree::new();
        for (key, value) in entries {
            let Some(group) = groups.get(key) else {
                return Err(ParamError::new(
                    ToolCallStatus::UndefinedParam,
                    format!(
                        "Undefined property \"{}\" for {}, supported properties: {}",
                        key,
                        path,
                        quoted_list(groups.keys().map(String::as_str))
                    ),
                ));
            };
            let (parsed_group, _) = group.parsed(value, &path.member(key, false))?;
            instances.insert(key.clone(), parsed_group);
        }
        let message = format!(
            "{} parsed with keys: {}",
            path,
            quoted_list(instances.keys().map(String::as_str))
        );
        Ok((
            ParameterKind::FixedCollection {
                groups: groups.clone(),
                instances: Some(instances),
            },
            message,
        ))
    }

    fn parse_resource_locator(&self, raw: &Value, path: &ParamPath, modes: &ParameterTree) -> Parsed {
        let shaped = match raw {
            Value::Object(entries)
                if entries.len() == 2
                    && entries.contains_key("mode")
                    && entries.contains_key("value") =>
            {
                Some((&entries["mode"], &entries["value"]))
            }
            _ => None,
        };
        let Some((mode, value)) = shaped else {
            return Err(ParamError::type_error(format!(
                "{} can only be parsed as dict{{\"mode\":str, \"value\":any}}, got {}",
                path, raw
            )));
        };

        let mode_name = match mode {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let Some(template) = modes.get(&mode_name) else {
            return Err(ParamError::new(
                ToolCallStatus::UndefinedParam,
                format!(
                    "Undefined mode \"{}\" for {}, supported modes: {}",
                    mode_name,
                    path,
                    quoted_list(modes.keys().map(String::as_str))
                ),
            ));
        };
        let (selected, _) = template.parsed(value, &path.mode(&mode_name))?;
        let message = format!("{} parsed with \"mode\"={}", path, mode_name);
        Ok((
            ParameterKind::ResourceLocator {
                modes: modes.clone(),
                selected: Some(SelectedMode {
                    mode: mode_name,
                    value: Box::new(selected),
                }),
            },
            message,
        ))
    }
}

/// Drops one pair of surrounding double quotes, which models often add to string values.
pub(crate) fn strip_quotes(text: &str) -> &str {
    if text.starts_with('"') && text.ends_with('"') {
        text.get(1..text.len() - 1).unwrap_or("")
    } else {
        text
    }
}
