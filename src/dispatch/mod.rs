//! The tool-call dispatcher.
//!
//! One model turn produces one call: a tool name plus a JSON payload. The dispatcher
//! maps it onto the catalog and the program and answers with a [`ToolCallOutcome`].
//! Nothing here returns a Rust error for bad model input; every failure becomes a
//! status and a message the model can act on.

pub mod boundary;
pub mod functions;
pub mod request;

pub use boundary::{HumanChannel, MarkdownFileSink, MemorySink, ResultSink, ScriptedHuman, SilentHuman};
pub use functions::intrinsic_functions;
pub use request::ToolName;

use crate::catalog::ToolCatalog;
use crate::config::AgentConfig;
use crate::status::{ToolCallOutcome, ToolCallStatus};
use crate::workflow::Program;
use request::{AskHelpRequest, DefineRequest, ImplementWorkflowRequest, RewriteParamsRequest, SubmitRequest};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// One handled call, as kept by a session recorder.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRecord {
    pub content: String,
    pub tool_name: String,
    pub thought: Option<String>,
    pub plan: Vec<String>,
    pub criticism: Option<String>,
    /// The payload minus the reasoning fields.
    pub tool_input: Value,
    pub tool_output: String,
    pub status: ToolCallStatus,
}

pub struct ToolDispatcher<'a> {
    catalog: &'a ToolCatalog,
    config: &'a AgentConfig,
    human: Box<dyn HumanChannel + 'a>,
    sink: Box<dyn ResultSink + 'a>,
}

impl<'a> ToolDispatcher<'a> {
    pub fn new(catalog: &'a ToolCatalog, config: &'a AgentConfig) -> Self {
        Self {
            catalog,
            config,
            human: Box::new(SilentHuman),
            sink: Box::new(MemorySink::default()),
        }
    }

    pub fn with_human(mut self, human: impl HumanChannel + 'a) -> Self {
        self.human = Box::new(human);
        self
    }

    pub fn with_sink(mut self, sink: impl ResultSink + 'a) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Handles one tool call against `program`.
    pub fn handle(&mut self, program: &mut Program, content: &str, tool_name: &str, input: Value) -> ActionRecord {
        let mut fields = match input {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut wrapped = Map::new();
                wrapped.insert("input".to_string(), other);
                wrapped
            }
        };
        let thought = take_text(&mut fields, "thought");
        let criticism = take_text(&mut fields, "criticism");
        let plan = take_plan(&mut fields);
        let tool_input = Value::Object(fields);

        if let Some(thought) = &thought {
            debug!(tool = tool_name, %thought, "Model reasoning");
        }

        let outcome = match ToolName::from_wire(tool_name) {
            Some(tool) => self.dispatch(program, tool, &tool_input),
            None => ToolCallOutcome::failure(
                ToolCallStatus::NoSuchTool,
                format!("No such action {}", tool_name),
            ),
        };
        info!(tool = tool_name, status = %outcome.status, "Handled tool call");

        ActionRecord {
            content: content.to_string(),
            tool_name: tool_name.to_string(),
            thought,
            plan,
            criticism,
            tool_input,
            tool_output: outcome.to_json_string(),
            status: outcome.status,
        }
    }

    fn dispatch(&mut self, program: &mut Program, tool: ToolName, input: &Value) -> ToolCallOutcome {
        match tool {
            ToolName::FunctionDefine => match decode::<DefineRequest>(tool, input) {
                Ok(request) => self.define(program, request),
                Err(outcome) => outcome,
            },
            ToolName::FunctionRewriteParams => match decode::<RewriteParamsRequest>(tool, input) {
                Ok(request) => rewrite_params(program, request),
                Err(outcome) => outcome,
            },
            ToolName::WorkflowImplement => match decode::<ImplementWorkflowRequest>(tool, input) {
                Ok(request) => program.implement_workflow(&request.workflow_name, &request.code),
                Err(outcome) => outcome,
            },
            ToolName::AskUserHelp => match decode::<AskHelpRequest>(tool, input) {
                Ok(request) => {
                    let answer = if self.config.prompts_human() {
                        self.human.ask_for_help(&request.problems)
                    } else {
                        String::new()
                    };
                    ToolCallOutcome::success(answer)
                }
                Err(outcome) => outcome,
            },
            ToolName::TaskSubmit => match decode::<SubmitRequest>(tool, input) {
                Ok(request) => {
                    self.sink.submit(&request.result);
                    ToolCallOutcome::success("successfully save to markdown")
                }
                Err(outcome) => outcome,
            },
        }
    }

    /// Defines every requested function that exists; misses are reported per item.
    fn define(&self, program: &mut Program, request: DefineRequest) -> ToolCallOutcome {
        let mut results = Vec::with_capacity(request.functions.len());
        let mut succeeded = 0;
        for (k, function) in request.functions.into_iter().enumerate() {
            let found = self.catalog.lookup(
                &function.integration_name,
                &function.resource_name,
                &function.operation_name,
            );
            match found {
                Ok(meta) => {
                    let shape = self.catalog.compile_shape(meta);
                    let node = program.nodes.define(
                        meta.clone(),
                        shape,
                        function.comments.trim(),
                        function.todo,
                    );
                    debug!(node = %node.name(), "Defined node");
                    results.push(Value::String(format!(
                        "function_{} defined SUCCESS: {}->{}->{}",
                        k, function.integration_name, function.resource_name, function.operation_name
                    )));
                    succeeded += 1;
                }
                Err(miss) => {
                    results.push(Value::String(format!("function {} defined FAILED: {}", k, miss)));
                }
            }
        }

        let status = if succeeded == results.len() {
            ToolCallStatus::ToolCallSuccess
        } else if succeeded > 0 {
            ToolCallStatus::ToolCallPartlySuccess
        } else {
            ToolCallStatus::NoSuchFunction
        };
        ToolCallOutcome::with_result(status, Value::Array(results))
    }
}

fn rewrite_params(program: &mut Program, request: RewriteParamsRequest) -> ToolCallOutcome {
    let available = program.nodes.names();
    let Some(node) = program.nodes.get_mut(&request.function_name) else {
        return ToolCallOutcome::failure_with_key(
            ToolCallStatus::NoSuchFunction,
            "ERROR",
            format!(
                "Undefined Function {}. Available functions = {}.",
                request.function_name,
                crate::parameter::quoted_list(available.iter().map(String::as_str))
            ),
        );
    };
    let Some(params) = request.decoded_params() else {
        return ToolCallOutcome::failure_with_key(
            ToolCallStatus::InputCannotParsed,
            "ERROR",
            "\"params\" field can't be parsed to json.",
        );
    };
    let outcome = node.rewrite_params(&params);
    if outcome.status.is_success() {
        node.comments = request.comments;
        node.todos = request.todo;
    }
    outcome
}

/// Reads a tool payload into its request shape, or answers with `InputTypeError`.
fn decode<T: DeserializeOwned>(tool: ToolName, input: &Value) -> Result<T, ToolCallOutcome> {
    serde_json::from_value(input.clone()).map_err(|e| {
        ToolCallOutcome::failure(
            ToolCallStatus::InputTypeError,
            format!("Input of {} does not match its schema: {}", tool, e),
        )
    })
}

fn take_text(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.shift_remove(key)? {
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn take_plan(fields: &mut Map<String, Value>) -> Vec<String> {
    match fields.shift_remove("plan") {
        Some(Value::Array(steps)) => steps
            .into_iter()
            .map(|step| match step {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(text)) => vec![text],
        Some(other) => vec![other.to_string()],
        None => Vec::new(),
    }
}
