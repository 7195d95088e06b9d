use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// The closed set of outcomes a tool call can report back to the model.
///
/// None of these are fatal: each one travels back as a status tag plus a
/// human-readable message so the model can correct itself on the next turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolCallStatus {
    ToolCallSuccess,
    ToolCallPartlySuccess,
    NoSuchTool,
    NoSuchFunction,
    UndefinedParam,
    RequiredParamUnprovided,
    ParamTypeError,
    ExpressionError,
    UnsupportedExpression,
    InputCannotParsed,
    InputTypeError,
}

impl ToolCallStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ToolCallStatus::ToolCallSuccess => "ToolCallSuccess",
            ToolCallStatus::ToolCallPartlySuccess => "ToolCallPartlySuccess",
            ToolCallStatus::NoSuchTool => "NoSuchTool",
            ToolCallStatus::NoSuchFunction => "NoSuchFunction",
            ToolCallStatus::UndefinedParam => "UndefinedParam",
            ToolCallStatus::RequiredParamUnprovided => "RequiredParamUnprovided",
            ToolCallStatus::ParamTypeError => "ParamTypeError",
            ToolCallStatus::ExpressionError => "ExpressionError",
            ToolCallStatus::UnsupportedExpression => "UnsupportedExpression",
            ToolCallStatus::InputCannotParsed => "InputCannotParsed",
            ToolCallStatus::InputTypeError => "InputTypeError",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolCallStatus::ToolCallSuccess)
    }
}

impl fmt::Display for ToolCallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The structured reply of a single tool call.
///
/// `payload` is the JSON object handed back to the model; it always carries a
/// `status` field matching `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallOutcome {
    pub status: ToolCallStatus,
    pub payload: Value,
}

impl ToolCallOutcome {
    /// A successful reply whose `result` is a string or a list of strings.
    pub fn success(result: impl Into<Value>) -> Self {
        Self::with_result(ToolCallStatus::ToolCallSuccess, result)
    }

    pub fn with_result(status: ToolCallStatus, result: impl Into<Value>) -> Self {
        Self {
            status,
            payload: json!({ "result": result.into(), "status": status.name() }),
        }
    }

    /// A failed reply. Nothing was changed, which the payload states explicitly.
    pub fn failure(status: ToolCallStatus, error: impl Into<String>) -> Self {
        Self::failure_with_key(status, "error", error)
    }

    /// Same as [`ToolCallOutcome::failure`] with a caller-chosen error key
    /// (lookup failures historically report under `ERROR`).
    pub fn failure_with_key(status: ToolCallStatus, key: &str, error: impl Into<String>) -> Self {
        let mut payload = serde_json::Map::new();
        payload.insert(key.to_string(), Value::String(error.into()));
        payload.insert("result".to_string(), Value::String("Nothing happened.".to_string()));
        payload.insert("status".to_string(), Value::String(status.name().to_string()));
        Self {
            status,
            payload: Value::Object(payload),
        }
    }

    pub fn to_json_string(&self) -> String {
        self.payload.to_string()
    }
}
