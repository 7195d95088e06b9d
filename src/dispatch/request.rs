use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// The fixed tool vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    FunctionDefine,
    FunctionRewriteParams,
    WorkflowImplement,
    AskUserHelp,
    TaskSubmit,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::FunctionDefine,
        ToolName::FunctionRewriteParams,
        ToolName::WorkflowImplement,
        ToolName::AskUserHelp,
        ToolName::TaskSubmit,
    ];

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.wire_name() == name)
    }

    /// The name the model calls the tool by.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ToolName::FunctionDefine => "function_define",
            ToolName::FunctionRewriteParams => "function_rewrite_params",
            ToolName::WorkflowImplement => "workflow_implment",
            ToolName::AskUserHelp => "ask_user_help",
            ToolName::TaskSubmit => "task_submit",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefineRequest {
    pub functions: Vec<FunctionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionRequest {
    pub integration_name: String,
    pub resource_name: String,
    pub operation_name: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default, rename = "TODO")]
    pub todo: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteParamsRequest {
    pub function_name: String,
    /// Either JSON text or an already decoded object.
    pub params: Value,
    #[serde(default)]
    pub comments: String,
    #[serde(default, rename = "TODO")]
    pub todo: Vec<String>,
}

impl RewriteParamsRequest {
    /// The decoded params, or `None` when the text form is not valid JSON.
    pub fn decoded_params(&self) -> Option<Value> {
        match &self.params {
            Value::String(text) => serde_json::from_str(&escape_control_chars(text)).ok(),
            other => Some(other.clone()),
        }
    }
}

/// Escapes raw control characters inside string literals so multi-line text decodes.
fn escape_control_chars(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut in_string = false;
    let mut after_backslash = false;
    for c in text.chars() {
        if !in_string {
            in_string = c == '"';
            escaped.push(c);
            continue;
        }
        if after_backslash {
            after_backslash = false;
        } else if c == '\\' {
            after_backslash = true;
        } else if c == '"' {
            in_string = false;
        }
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) < 0x20 => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplementWorkflowRequest {
    pub workflow_name: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskHelpRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub problems: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub result: String,
}

/// Takes a string as is and renders any other JSON value as text.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
