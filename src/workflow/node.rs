use crate::catalog::{NodeMeta, NodeType};
use crate::parameter::{ParameterTree, quoted_list, refresh_tree, tree_to_json};
use crate::status::{ToolCallOutcome, ToolCallStatus};
use serde_json::Value;
use tracing::debug;

const PARAMS_PREFIX: &str = "  params = ";

/// One defined workflow step: an operation from the catalog plus its own parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInstance {
    pub id: usize,
    pub meta: NodeMeta,
    pub comments: String,
    pub todos: Vec<String>,
    params: ParameterTree,
}

impl NodeInstance {
    pub fn new(id: usize, meta: NodeMeta, params: ParameterTree) -> Self {
        Self {
            id,
            meta,
            comments: String::new(),
            todos: Vec::new(),
            params,
        }
    }

    pub fn with_notes(mut self, comments: impl Into<String>, todos: Vec<String>) -> Self {
        self.comments = comments.into();
        self.todos = todos;
        self
    }

    /// `trigger_0`, `action_3`, ...
    pub fn name(&self) -> String {
        format!("{}_{}", self.meta.node_type, self.id)
    }

    pub fn params(&self) -> &ParameterTree {
        &self.params
    }

    /// True when the node needs no parameters or at least one has been given.
    pub fn implemented(&self) -> bool {
        let mut fields = self.params.values().filter(|node| !node.is_notice()).peekable();
        fields.peek().is_none() || self.params.values().any(|node| node.data_is_set())
    }

    /// The set parameters as one JSON object.
    pub fn params_json(&self) -> Value {
        tree_to_json(&self.params)
    }

    /// Replaces all parameters with `input`, all or nothing.
    ///
    /// Parsing happens on a refreshed copy of the tree. The copy replaces the live tree
    /// only when every key was accepted, so keys left out of `input` end up unset and a
    /// rejected call leaves the node exactly as it was.
    pub fn rewrite_params(&mut self, input: &Value) -> ToolCallOutcome {
        let name = self.name();
        let Value::Object(entries) = input else {
            return ToolCallOutcome::failure(
                ToolCallStatus::ParamTypeError,
                format!(
                    "Parameter Type Error: The parameter is expected to be a json format string which can be parsed as dict type. However, you are giving string parsed as {}",
                    json_type_name(input)
                ),
            );
        };

        let mut next = self.params.clone();
        refresh_tree(&mut next);

        let mut messages = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            if !next.contains_key(key) {
                return ToolCallOutcome::failure(
                    ToolCallStatus::UndefinedParam,
                    format!(
                        "Undefined input parameter \"{}\" for {}.Supported parameters: {}",
                        key,
                        name,
                        quoted_list(next.keys().map(String::as_str))
                    ),
                );
            }
            if value.as_str().is_some_and(str::is_empty) {
                return ToolCallOutcome::failure(
                    ToolCallStatus::RequiredParamUnprovided,
                    format!(
                        "input parameter is null, \"{}\" for {}. You should put something in it.",
                        key, name
                    ),
                );
            }
            let Some(node) = next.get_mut(key) else {
                continue;
            };
            let (status, message) = node.parse_value(value);
            if !status.is_success() {
                debug!(node = %name, key = %key, %status, "Parameter rejected");
                return ToolCallOutcome::failure(status, message);
            }
            messages.push(Value::String(message));
        }

        self.params = next;
        ToolCallOutcome::success(Value::Array(messages))
    }

    /// The `Function param descriptions:` block shown to the model for this node.
    pub fn describe_params(&self, max_depth: usize) -> Vec<String> {
        if self.params.is_empty() {
            return vec!["This function doesn't need params".to_string()];
        }
        let mut lines = vec!["Function param descriptions:".to_string()];
        for (k, node) in self.params.values().enumerate() {
            lines.extend(node.describe(&k.to_string(), 2, max_depth));
        }
        lines
    }

    /// The node as a function-like block with its docstring.
    pub fn render(&self) -> Vec<String> {
        self.render_block(true)
    }

    /// The node block without the docstring.
    pub fn render_clean(&self) -> Vec<String> {
        self.render_block(false)
    }

    /// The parameter descriptions followed by the node block.
    pub fn render_with_descriptions(&self, max_depth: usize) -> Vec<String> {
        let mut lines = self.describe_params(max_depth);
        lines.extend(self.render());
        lines
    }

    fn render_block(&self, with_docstring: bool) -> Vec<String> {
        let is_action = self.meta.node_type == NodeType::Action;
        let signature_input = if is_action {
            "input_data: List[Dict] =  [{...}]"
        } else {
            ""
        };
        let mut lines = vec![format!("def {}({}):", self.name(), signature_input)];

        if with_docstring && (!self.comments.is_empty() || !self.todos.is_empty()) {
            lines.push("  \"\"\"".to_string());
            if !self.comments.is_empty() {
                lines.push(format!("  comments: {}", self.comments));
            }
            if !self.todos.is_empty() {
                lines.push("  TODOs: ".to_string());
                lines.extend(self.todos.iter().map(|todo| format!("    - {}", todo)));
            }
            lines.push("  \"\"\"".to_string());
        }

        let params_text =
            serde_json::to_string_pretty(&self.params_json()).unwrap_or_else(|_| "{}".to_string());
        let continuation = " ".repeat(PARAMS_PREFIX.len());
        for (k, line) in params_text.lines().enumerate() {
            if k == 0 {
                let mut first = format!("{}{}", PARAMS_PREFIX, line);
                if !self.implemented() {
                    first.push_str("  # to be Implemented");
                }
                lines.push(first);
            } else {
                lines.push(format!("{}{}", continuation, line));
            }
        }

        lines.push(format!(
            "  function = transparent_{}(integration=\"{}\", resource=\"{}\", operation=\"{}\")",
            self.meta.node_type,
            self.meta.integration_name,
            self.meta.resource_name,
            self.meta.operation_name
        ));
        let run_input = if is_action { "input_data" } else { "None" };
        lines.push(format!(
            "  output_data = function.run(input_data={}, params=params)",
            run_input
        ));
        lines.push("  return output_data".to_string());
        lines
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
