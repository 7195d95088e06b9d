use super::request::ToolName;
use serde_json::{Map, Value, json};

/// Function-calling schemas of the five tools, in the order they are offered to the model.
pub fn intrinsic_functions() -> Vec<Value> {
    ToolName::ALL.iter().map(|tool| function_schema(*tool)).collect()
}

pub fn function_schema(tool: ToolName) -> Value {
    match tool {
        ToolName::FunctionDefine => with_reasoning(
            tool,
            "Define a list of functions. Each one must name an existing (integration, resource, operation) triple.",
            json!({
                "functions": {
                    "type": "array",
                    "description": "The functions to define.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "integration_name": { "type": "string" },
                            "resource_name": { "type": "string" },
                            "operation_name": { "type": "string" },
                            "comments": {
                                "type": "string",
                                "description": "Shown to the user: how this node is used in the workflow."
                            },
                            "TODO": {
                                "type": "array",
                                "description": "What is still needed to implement, test and refine this function.",
                                "items": { "type": "string" }
                            }
                        },
                        "required": ["integration_name", "resource_name", "operation_name", "comments", "TODO"]
                    }
                }
            }),
            &["functions"],
        ),
        ToolName::FunctionRewriteParams => with_reasoning(
            tool,
            "Give the params of an already defined function, following its param descriptions. This overwrites all current params.",
            json!({
                "function_name": {
                    "type": "string",
                    "description": "An already defined function, such as 'action_0' or 'trigger_0'."
                },
                "params": {
                    "type": "string",
                    "description": "The JSON object of the input params."
                },
                "comments": {
                    "type": "string",
                    "description": "Shown to the user: how this node is used in the workflow."
                },
                "TODO": {
                    "type": "array",
                    "description": "What is still needed to implement, test and refine this function.",
                    "items": { "type": "string" }
                }
            }),
            &["function_name", "params", "comments", "TODO"],
        ),
        ToolName::WorkflowImplement => with_reasoning(
            tool,
            "Implement a workflow body, starting with \"def mainWorkflow...\" or \"def subworkflow_xxx...\".",
            json!({
                "workflow_name": {
                    "type": "string",
                    "description": "\"mainWorkflow\" or \"subworkflow_x\". An existing workflow is overwritten."
                },
                "code": {
                    "type": "string",
                    "description": "The workflow code, with comments and TODOs. mainWorkflow takes trigger_input; sub-workflows take father_workflow_input."
                }
            }),
            &["workflow_name", "code"],
        ),
        ToolName::AskUserHelp => json!({
            "name": tool.wire_name(),
            "description": "Ask the user for help with a problem you cannot solve alone.",
            "parameters": {
                "type": "object",
                "properties": {
                    "problems": {
                        "type": "string",
                        "description": "The problem you are facing."
                    }
                }
            }
        }),
        ToolName::TaskSubmit => json!({
            "name": tool.wire_name(),
            "description": "Submit the finished task. The user may answer with feedback.",
            "parameters": {
                "type": "object",
                "properties": {
                    "result": {
                        "type": "string",
                        "description": "What you have done, in Markdown."
                    }
                }
            }
        }),
    }
}

/// Adds the `thought`/`plan`/`criticism` fields every editing tool carries.
fn with_reasoning(tool: ToolName, description: &str, fields: Value, required: &[&str]) -> Value {
    let mut properties = Map::new();
    properties.insert(
        "thought".to_string(),
        json!({ "type": "string", "description": "Why you choose this function." }),
    );
    properties.insert(
        "plan".to_string(),
        json!({
            "type": "array",
            "description": "What you will do in the following steps.",
            "items": { "type": "string" }
        }),
    );
    properties.insert(
        "criticism".to_string(),
        json!({ "type": "string", "description": "The main weakness of the current plan." }),
    );
    if let Value::Object(fields) = fields {
        properties.extend(fields);
    }

    let mut required_fields = vec!["thought", "plan", "criticism"];
    required_fields.extend_from_slice(required);

    json!({
        "name": tool.wire_name(),
        "description": description,
        "parameters": {
            "type": "object",
            "properties": properties,
            "required": required_fields
        }
    })
}
