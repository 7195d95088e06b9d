//! Common test fixtures: a small integration catalog and helpers around it.
use kumitate::catalog::IntegrationDefinition;
use kumitate::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// A catalog exercising every parameter variant.
///
/// - `manualTrigger`: no resources, no operations, a single notice.
/// - `slack`: two resources with gated operations; `message.post` carries an options
///   field, a resource locator, a collection, a multi-valued fixed collection and an
///   unsupported `json` field.
/// - `googleSheets`: one resource with ungated operations and sibling-gated fields.
/// - `webhook`: a trigger by name with plain scalars.
/// - `gmail`: present in the file but never allow-listed.
#[allow(dead_code)]
pub const CATALOG_JSON: &str = r##"[
  {
    "name": "n8n-nodes-base.manualTrigger",
    "displayName": "Manual Trigger",
    "description": "Runs the flow on clicking a button",
    "properties": [
      {
        "displayName": "This node is where a manual workflow execution starts.",
        "name": "notice",
        "type": "notice",
        "default": ""
      }
    ]
  },
  {
    "name": "n8n-nodes-base.slack",
    "displayName": "Slack",
    "description": "Consume Slack API",
    "properties": [
      {
        "displayName": "Authentication",
        "name": "authentication",
        "type": "options",
        "options": [
          { "name": "Access Token", "value": "accessToken" },
          { "name": "OAuth2", "value": "oAuth2" }
        ],
        "default": "accessToken"
      },
      {
        "displayName": "Resource",
        "name": "resource",
        "type": "options",
        "noDataExpression": true,
        "options": [
          { "name": "Channel", "value": "channel" },
          { "name": "Message", "value": "message" }
        ],
        "default": "message"
      },
      {
        "displayName": "Operation",
        "name": "operation",
        "type": "options",
        "noDataExpression": true,
        "displayOptions": { "show": { "resource": ["channel"] } },
        "options": [
          { "name": "Create", "value": "create", "description": "Initiates a public or private channel-based conversation" },
          { "name": "Archive", "value": "archive", "description": "Archives a conversation" }
        ],
        "default": "create"
      },
      {
        "displayName": "Operation",
        "name": "operation",
        "type": "options",
        "noDataExpression": true,
        "displayOptions": { "show": { "resource": ["message"] } },
        "options": [
          { "name": "Send", "value": "post", "description": "Post a message to a channel" },
          { "name": "Update", "value": "update", "description": "Updates a message" }
        ],
        "default": "post"
      },
      {
        "displayName": "Channel Name",
        "name": "channelId",
        "type": "string",
        "required": true,
        "default": "",
        "displayOptions": { "show": { "resource": ["channel"], "operation": ["create"] } }
      },
      {
        "displayName": "Send Message To",
        "name": "select",
        "type": "options",
        "required": true,
        "options": [
          { "name": "Channel", "value": "channel" },
          { "name": "User", "value": "user" }
        ],
        "default": "",
        "displayOptions": { "show": { "resource": ["message"], "operation": ["post"] } }
      },
      {
        "displayName": "Channel",
        "name": "channelId",
        "type": "resourceLocator",
        "required": true,
        "default": { "mode": "list", "value": "" },
        "description": "The Slack channel to send to",
        "displayOptions": {
          "show": { "resource": ["message"], "operation": ["post"], "select": ["channel"] }
        },
        "modes": [
          { "displayName": "From List", "name": "list", "type": "list" },
          { "displayName": "By ID", "name": "id", "type": "string", "placeholder": "C0122KQ70S7E" },
          { "displayName": "By Name", "name": "name", "type": "string", "placeholder": "#general" },
          { "displayName": "By URL", "name": "url", "type": "string" }
        ]
      },
      {
        "displayName": "Message Text",
        "name": "text",
        "type": "string",
        "default": "",
        "displayOptions": { "show": { "resource": ["message"], "operation": ["post", "update"] } }
      },
      {
        "displayName": "Link Names",
        "name": "linkNames",
        "type": "boolean",
        "noDataExpression": true,
        "default": false,
        "displayOptions": { "show": { "resource": ["message"], "operation": ["post"] } }
      },
      {
        "displayName": "Other Options",
        "name": "otherOptions",
        "type": "collection",
        "placeholder": "Add option",
        "default": {},
        "displayOptions": { "show": { "resource": ["message"], "operation": ["post"] } },
        "options": [
          { "displayName": "Include Link to Workflow", "name": "includeLinkToWorkflow", "type": "boolean", "default": true },
          { "displayName": "Reply to Thread", "name": "thread_ts", "type": "number", "default": 0 },
          { "displayName": "Unfurl Links", "name": "unfurl_links", "type": "boolean", "default": false }
        ]
      },
      {
        "displayName": "Blocks",
        "name": "blocksUi",
        "type": "fixedCollection",
        "typeOptions": { "multipleValues": true },
        "default": {},
        "displayOptions": { "show": { "resource": ["message"], "operation": ["post"] } },
        "options": [
          {
            "displayName": "Block",
            "name": "blocksValues",
            "values": [
              {
                "displayName": "Type",
                "name": "type",
                "type": "options",
                "options": [
                  { "name": "Section", "value": "section" },
                  { "name": "Divider", "value": "divider" }
                ],
                "default": "section"
              },
              { "displayName": "Text", "name": "text", "type": "string", "default": "" }
            ]
          }
        ]
      },
      {
        "displayName": "Attachments",
        "name": "attachmentsJson",
        "type": "json",
        "default": "",
        "displayOptions": { "show": { "resource": ["message"], "operation": ["post"] } }
      },
      {
        "displayName": "Message ID",
        "name": "ts",
        "type": "string",
        "required": true,
        "default": "",
        "displayOptions": { "show": { "resource": ["message"], "operation": ["update"] } }
      }
    ]
  },
  {
    "name": "n8n-nodes-base.googleSheets",
    "displayName": "Google Sheets",
    "description": "Read, update and write data to Google Sheets",
    "properties": [
      {
        "displayName": "Resource",
        "name": "resource",
        "type": "options",
        "options": [ { "name": "Sheet", "value": "sheet" } ],
        "default": "sheet"
      },
      {
        "displayName": "Operation",
        "name": "operation",
        "type": "options",
        "options": [
          { "name": "Read", "value": "read", "description": "Read data from a sheet" },
          { "name": "Append", "value": "append", "description": "Append data to a sheet" }
        ],
        "default": "read"
      },
      {
        "displayName": "Spreadsheet ID",
        "name": "sheetId",
        "type": "string",
        "required": true,
        "default": "",
        "displayOptions": { "show": { "operation": ["read", "append"] } }
      },
      {
        "displayName": "Range",
        "name": "range",
        "type": "string",
        "default": "A:F",
        "displayOptions": { "show": { "operation": ["read", "append"] } }
      },
      {
        "displayName": "Data Mode",
        "name": "dataMode",
        "type": "options",
        "options": [
          { "name": "Auto-Map Input Data", "value": "autoMapInputData" },
          { "name": "Define Below", "value": "define" }
        ],
        "default": "autoMapInputData",
        "displayOptions": { "hide": { "operation": ["read"] } }
      },
      {
        "displayName": "Fields",
        "name": "fieldsUi",
        "type": "fixedCollection",
        "default": {},
        "displayOptions": { "show": { "operation": ["append"], "dataMode": ["define"] } },
        "options": [
          {
            "displayName": "Field",
            "name": "fieldValues",
            "values": [
              { "displayName": "Field Name", "name": "fieldId", "type": "string", "default": "" },
              { "displayName": "Field Value", "name": "fieldValue", "type": "string", "default": "" }
            ]
          }
        ]
      },
      {
        "displayName": "Options",
        "name": "options",
        "type": "collection",
        "default": {},
        "displayOptions": { "show": { "operation": ["read"] } },
        "options": [
          {
            "displayName": "Value Render Mode",
            "name": "valueRenderMode",
            "type": "options",
            "options": [
              { "name": "Formatted Value", "value": "FORMATTED_VALUE" },
              { "name": "Unformatted Value", "value": "UNFORMATTED_VALUE" }
            ],
            "default": "UNFORMATTED_VALUE"
          },
          { "displayName": "Header Row", "name": "headerRow", "type": "number", "default": 1 }
        ]
      }
    ]
  },
  {
    "name": "n8n-nodes-base.webhook",
    "displayName": "Webhook",
    "description": "Starts the workflow when a webhook is called",
    "properties": [
      {
        "displayName": "HTTP Method",
        "name": "httpMethod",
        "type": "options",
        "options": [
          { "name": "GET", "value": "GET" },
          { "name": "POST", "value": "POST" }
        ],
        "default": "GET"
      },
      { "displayName": "Path", "name": "path", "type": "string", "required": true, "default": "" },
      { "displayName": "Response Code", "name": "responseCode", "type": "number", "default": 200 }
    ]
  },
  {
    "name": "n8n-nodes-base.gmail",
    "displayName": "Gmail",
    "description": "Consume the Gmail API",
    "properties": [
      {
        "displayName": "Operation",
        "name": "operation",
        "type": "options",
        "options": [ { "name": "Send", "value": "send" } ],
        "default": "send"
      }
    ]
  }
]"##;

#[allow(dead_code)]
pub fn fixture_allow_list() -> Vec<String> {
    ["manualTrigger", "slack", "googleSheets.sheet.read", "webhook"]
        .iter()
        .map(|entry| entry.to_string())
        .collect()
}

#[allow(dead_code)]
pub fn fixture_definitions() -> Vec<IntegrationDefinition> {
    serde_json::from_str(CATALOG_JSON).expect("fixture catalog is valid JSON")
}

#[allow(dead_code)]
pub fn fixture_catalog() -> ToolCatalog {
    ToolCatalog::resolve(&fixture_definitions(), &fixture_allow_list())
        .expect("fixture allow-list is valid")
}

#[allow(dead_code)]
pub fn fixture_config() -> AgentConfig {
    let mut config = AgentConfig::default();
    config.parser.nodes_white_list = fixture_allow_list();
    config
}

/// The compiled shape of `slack.message.post`.
#[allow(dead_code)]
pub fn slack_post_shape() -> ParameterTree {
    let catalog = fixture_catalog();
    let meta = catalog
        .lookup("slack", "message", "post")
        .expect("slack.message.post is allow-listed")
        .clone();
    catalog.compile_shape(&meta)
}

/// Takes one node out of a compiled shape.
#[allow(dead_code)]
pub fn node(shape: &ParameterTree, name: &str) -> ParameterNode {
    shape
        .get(name)
        .unwrap_or_else(|| panic!("shape has no parameter {}", name))
        .clone()
}

/// Writes the fixture catalog and a config pointing at it into `dir`; returns the
/// config path.
#[allow(dead_code)]
pub fn write_fixture_files(dir: &Path, extra_yaml: &str) -> PathBuf {
    fs::write(dir.join("nodes.json"), CATALOG_JSON).expect("write catalog");
    let yaml = format!(
        "parser:\n  nodes_json_path: nodes.json\n  nodes_white_list:\n{}\n{}",
        fixture_allow_list()
            .iter()
            .map(|entry| format!("    - {}", entry))
            .collect::<Vec<_>>()
            .join("\n"),
        extra_yaml
    );
    let config_path = dir.join("agent.yaml");
    fs::write(&config_path, yaml).expect("write config");
    config_path
}
