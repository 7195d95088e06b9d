//! Dispatcher tests: each tool end to end, from the raw model payload to the reply
//! and the program state it leaves behind.
mod common;

use common::*;
use kumitate::dispatch::{MemorySink, ScriptedHuman, ToolName, intrinsic_functions};
use kumitate::prelude::*;
use serde_json::{Value, json};

fn reply(record: &ActionRecord) -> Value {
    serde_json::from_str(&record.tool_output).expect("tool output is JSON")
}

fn define_slack_post(dispatcher: &mut ToolDispatcher, program: &mut Program) -> ActionRecord {
    dispatcher.handle(
        program,
        "",
        "function_define",
        json!({
            "functions": [{
                "integration_name": "slack",
                "resource_name": "message",
                "operation_name": "post",
                "comments": "  send the report  ",
                "TODO": ["fill in the channel"]
            }]
        }),
    )
}

#[test]
fn test_define_success() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);

    let record = define_slack_post(&mut dispatcher, &mut program);
    assert_eq!(record.status, ToolCallStatus::ToolCallSuccess);
    assert_eq!(
        reply(&record),
        json!({
            "result": ["function_0 defined SUCCESS: slack->message->post"],
            "status": "ToolCallSuccess"
        })
    );
    let node = program.nodes.get("action_0").unwrap();
    assert_eq!(node.comments, "send the report");
    assert_eq!(node.todos, vec!["fill in the channel"]);
    assert!(!node.implemented());
}

#[test]
fn test_define_partial_success() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);

    let record = dispatcher.handle(
        &mut program,
        "",
        "function_define",
        json!({
            "functions": [
                {"integration_name": "slack", "resource_name": "message", "operation_name": "post"},
                {"integration_name": "slack", "resource_name": "message", "operation_name": "delete"},
                {"integration_name": "webhook", "resource_name": "default", "operation_name": "default"}
            ]
        }),
    );
    assert_eq!(record.status, ToolCallStatus::ToolCallPartlySuccess);
    assert_eq!(
        reply(&record)["result"],
        json!([
            "function_0 defined SUCCESS: slack->message->post",
            "function 1 defined FAILED: not such operation slack->message->delete",
            "function_2 defined SUCCESS: webhook->default->default"
        ])
    );
    assert_eq!(program.nodes.names(), vec!["action_0", "trigger_0"]);
}

#[test]
fn test_define_all_failed() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);

    let record = dispatcher.handle(
        &mut program,
        "",
        "function_define",
        json!({
            "functions": [
                {"integration_name": "gmail", "resource_name": "default", "operation_name": "send"}
            ]
        }),
    );
    assert_eq!(record.status, ToolCallStatus::NoSuchFunction);
    assert_eq!(
        reply(&record)["result"],
        json!(["function 0 defined FAILED: not such integration gmail"])
    );
    assert!(program.nodes.is_empty());
}

#[test]
fn test_unknown_tool() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);

    let record = dispatcher.handle(&mut program, "", "fly", json!({}));
    assert_eq!(record.status, ToolCallStatus::NoSuchTool);
    assert_eq!(
        reply(&record),
        json!({"error": "No such action fly", "result": "Nothing happened.", "status": "NoSuchTool"})
    );
}

#[test]
fn test_payload_that_does_not_match_schema() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);

    let record = dispatcher.handle(&mut program, "", "function_define", json!({"functions": "slack"}));
    assert_eq!(record.status, ToolCallStatus::InputTypeError);
    assert!(
        reply(&record)["error"]
            .as_str()
            .unwrap()
            .starts_with("Input of function_define does not match its schema")
    );
}

#[test]
fn test_reasoning_fields_are_recorded_apart() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);

    let record = dispatcher.handle(
        &mut program,
        "calling implement",
        "workflow_implment",
        json!({
            "thought": "the trigger is ready",
            "plan": ["write main", "submit"],
            "criticism": "no error handling yet",
            "workflow_name": "mainWorkflow",
            "code": "def mainWorkflow(trigger_input):\n  return trigger_0()"
        }),
    );
    assert_eq!(record.status, ToolCallStatus::ToolCallSuccess);
    assert_eq!(record.content, "calling implement");
    assert_eq!(record.thought.as_deref(), Some("the trigger is ready"));
    assert_eq!(record.plan, vec!["write main", "submit"]);
    assert_eq!(record.criticism.as_deref(), Some("no error handling yet"));
    assert_eq!(
        record.tool_input,
        json!({
            "workflow_name": "mainWorkflow",
            "code": "def mainWorkflow(trigger_input):\n  return trigger_0()"
        })
    );
    assert_eq!(reply(&record)["result"], json!("mainWorkflow has been re-implemented"));
    assert!(program.render().ends_with("return trigger_0()"));
}

#[test]
fn test_rewrite_params_through_dispatcher() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);
    define_slack_post(&mut dispatcher, &mut program);

    let record = dispatcher.handle(
        &mut program,
        "",
        "function_rewrite_params",
        json!({
            "function_name": "action_0",
            "params": "{\"select\": \"channel\", \"channelId\": {\"mode\": \"id\", \"value\": \"C123\"}}",
            "comments": "post to the team channel",
            "TODO": []
        }),
    );
    assert_eq!(record.status, ToolCallStatus::ToolCallSuccess);
    let node = program.nodes.get("action_0").unwrap();
    assert_eq!(
        node.params_json(),
        json!({"select": "channel", "channelId": {"mode": "id", "value": "C123"}})
    );
    assert_eq!(node.comments, "post to the team channel");
    assert!(node.todos.is_empty());
}

#[test]
fn test_rewrite_params_failure_keeps_notes() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);
    define_slack_post(&mut dispatcher, &mut program);

    let record = dispatcher.handle(
        &mut program,
        "",
        "function_rewrite_params",
        json!({
            "function_name": "action_0",
            "params": {"select": "dm"},
            "comments": "changed my mind",
            "TODO": ["nothing"]
        }),
    );
    assert_eq!(record.status, ToolCallStatus::ParamTypeError);
    let node = program.nodes.get("action_0").unwrap();
    assert_eq!(node.comments, "send the report");
    assert_eq!(node.todos, vec!["fill in the channel"]);
    assert_eq!(node.params_json(), json!({}));
}

#[test]
fn test_rewrite_params_text_with_raw_newlines() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);
    define_slack_post(&mut dispatcher, &mut program);

    let record = dispatcher.handle(
        &mut program,
        "",
        "function_rewrite_params",
        json!({
            "function_name": "action_0",
            "params": "{\n  \"text\": \"line one\nline two\tend\"\n}"
        }),
    );
    assert_eq!(record.status, ToolCallStatus::ToolCallSuccess);
    assert_eq!(
        program.nodes.get("action_0").unwrap().params_json(),
        json!({"text": "line one\nline two\tend"})
    );
}

#[test]
fn test_rewrite_params_unknown_function() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);
    define_slack_post(&mut dispatcher, &mut program);

    let record = dispatcher.handle(
        &mut program,
        "",
        "function_rewrite_params",
        json!({"function_name": "action_9", "params": "{}"}),
    );
    assert_eq!(record.status, ToolCallStatus::NoSuchFunction);
    assert_eq!(
        reply(&record),
        json!({
            "ERROR": r#"Undefined Function action_9. Available functions = ["action_0"]."#,
            "result": "Nothing happened.",
            "status": "NoSuchFunction"
        })
    );
}

#[test]
fn test_rewrite_params_unparseable_json() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);
    define_slack_post(&mut dispatcher, &mut program);

    let record = dispatcher.handle(
        &mut program,
        "",
        "function_rewrite_params",
        json!({"function_name": "action_0", "params": "{select: channel"}),
    );
    assert_eq!(record.status, ToolCallStatus::InputCannotParsed);
    assert_eq!(
        reply(&record)["ERROR"],
        json!("\"params\" field can't be parsed to json.")
    );
}

#[test]
fn test_invalid_workflow_name() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(&catalog, &config);

    let record = dispatcher.handle(
        &mut program,
        "",
        "workflow_implment",
        json!({"workflow_name": "helper", "code": "def helper(): pass"}),
    );
    assert_eq!(record.status, ToolCallStatus::InputTypeError);
    assert_eq!(program.subworkflows().count(), 0);
}

#[test]
fn test_ask_user_help_in_development() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut human = ScriptedHuman::new(["use #general"]);
    {
        let mut dispatcher = ToolDispatcher::new(&catalog, &config).with_human(&mut human);
        let record = dispatcher.handle(
            &mut program,
            "",
            "ask_user_help",
            json!({"problems": "which channel?"}),
        );
        assert_eq!(record.status, ToolCallStatus::ToolCallSuccess);
        assert_eq!(reply(&record)["result"], json!("use #general"));
    }
    assert_eq!(human.asked, vec!["which channel?"]);
}

#[test]
fn test_ask_user_help_in_production_never_prompts() {
    let catalog = fixture_catalog();
    let mut config = fixture_config();
    config.environment = Environment::Production;
    let mut program = Program::new();
    let mut human = ScriptedHuman::new(["ignored"]);
    {
        let mut dispatcher = ToolDispatcher::new(&catalog, &config).with_human(&mut human);
        let record = dispatcher.handle(&mut program, "", "ask_user_help", json!({"problems": "help"}));
        assert_eq!(reply(&record)["result"], json!(""));
    }
    assert!(human.asked.is_empty());
}

#[test]
fn test_ask_user_help_accepts_any_problems_shape() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut human = ScriptedHuman::new(["both are on the wiki"]);
    {
        let mut dispatcher = ToolDispatcher::new(&catalog, &config).with_human(&mut human);
        let record = dispatcher.handle(
            &mut program,
            "",
            "ask_user_help",
            json!({"problems": ["no creds", "no channel"]}),
        );
        assert_eq!(record.status, ToolCallStatus::ToolCallSuccess);
        assert_eq!(reply(&record)["result"], json!("both are on the wiki"));
    }
    assert_eq!(human.asked, vec![r#"["no creds","no channel"]"#]);
}

#[test]
fn test_task_submit_without_result() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut sink = MemorySink::default();
    {
        let mut dispatcher = ToolDispatcher::new(&catalog, &config).with_sink(&mut sink);
        let record = dispatcher.handle(&mut program, "", "task_submit", json!({}));
        assert_eq!(record.status, ToolCallStatus::ToolCallSuccess);
        assert_eq!(reply(&record)["result"], json!("successfully save to markdown"));
    }
    assert_eq!(sink.submitted, vec![""]);
}

#[test]
fn test_task_submit() {
    let (catalog, config) = (fixture_catalog(), fixture_config());
    let mut program = Program::new();
    let mut sink = MemorySink::default();
    {
        let mut dispatcher = ToolDispatcher::new(&catalog, &config).with_sink(&mut sink);
        let record = dispatcher.handle(
            &mut program,
            "",
            "task_submit",
            json!({"result": "# Done\nPosts the summary to slack."}),
        );
        assert_eq!(record.status, ToolCallStatus::ToolCallSuccess);
        assert_eq!(reply(&record)["result"], json!("successfully save to markdown"));
    }
    assert_eq!(sink.submitted, vec!["# Done\nPosts the summary to slack."]);
}

#[test]
fn test_intrinsic_functions() {
    let functions = intrinsic_functions();
    let names: Vec<&str> = functions
        .iter()
        .map(|function| function["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ToolName::ALL.iter().map(ToolName::wire_name).collect::<Vec<_>>()
    );
    assert_eq!(
        functions[0]["parameters"]["required"],
        json!(["thought", "plan", "criticism", "functions"])
    );
    assert!(functions[4]["parameters"]["properties"].get("thought").is_none());
    for tool in ToolName::ALL {
        assert_eq!(ToolName::from_wire(tool.wire_name()), Some(tool));
    }
    assert_eq!(ToolName::from_wire("workflow_implement"), None);
}
