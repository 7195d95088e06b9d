//! # Kumitate - Schema-Tree Engine for Model-Built Workflows
//!
//! **Kumitate** lets a language model assemble an automation workflow one node at a time.
//! It turns a catalog of integration definitions into typed parameter trees, validates
//! the model's proposed values against them with path-aware messages, and renders the
//! program built so far back into readable pseudo-code for the next turn.
//!
//! ## Core Workflow
//!
//! 1.  **Load the catalog**: read the integration definitions and narrow them with an
//!     allow-list into a [`catalog::ToolCatalog`].
//! 2.  **Offer tools**: show the model [`catalog::ToolCatalog::describe_tools`] and the
//!     schemas from [`dispatch::intrinsic_functions`].
//! 3.  **Dispatch calls**: feed every model call to a [`dispatch::ToolDispatcher`], which
//!     defines nodes, rewrites their parameters and stores workflow bodies in a
//!     [`workflow::Program`].
//! 4.  **Render**: hand [`workflow::Program::render`] back to the model.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kumitate::prelude::*;
//! use serde_json::json;
//!
//! # fn run() -> Result<()> {
//! let config = AgentConfig::from_file("agent.yaml")?;
//! let catalog = ToolCatalog::from_config(&config)?;
//! println!("{}", catalog.describe_tools(&config));
//!
//! let mut program = Program::new();
//! let mut dispatcher = ToolDispatcher::new(&catalog, &config);
//!
//! let record = dispatcher.handle(
//!     &mut program,
//!     "",
//!     "function_define",
//!     json!({
//!         "thought": "post the summary to slack",
//!         "functions": [{
//!             "integration_name": "slack",
//!             "resource_name": "message",
//!             "operation_name": "post",
//!             "comments": "send the report",
//!             "TODO": ["fill in the channel"]
//!         }]
//!     }),
//! );
//! println!("{}", record.tool_output);
//!
//! let record = dispatcher.handle(
//!     &mut program,
//!     "",
//!     "function_rewrite_params",
//!     json!({
//!         "function_name": "action_0",
//!         "params": "{\"select\": \"channel\", \"text\": \"=$json.summary\"}",
//!         "comments": "send the report",
//!         "TODO": []
//!     }),
//! );
//! assert_eq!(record.status, ToolCallStatus::ToolCallSuccess);
//! println!("{}", program.render());
//! # Ok(())
//! # }
//! ```
//!
//! ## Parameter Trees
//!
//! Each defined node owns a [`parameter::ParameterTree`]. Nodes are a closed sum type
//! ([`parameter::ParameterKind`]): strings, numbers, booleans, options, collections,
//! fixed collections, resource locators and notices. Parsing is copy-on-write, so a
//! rejected value never leaves a node half-updated.

pub mod catalog;
pub mod compiler;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod parameter;
pub mod prelude;
pub mod status;
pub mod workflow;
