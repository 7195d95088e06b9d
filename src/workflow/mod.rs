//! The program under construction: node instances, their registry and the free-text
//! workflow bodies.

pub mod node;
pub mod program;
pub mod registry;
pub mod unit;

pub use node::NodeInstance;
pub use program::Program;
pub use registry::NodeRegistry;
pub use unit::{
    MAIN_WORKFLOW_NAME, MAIN_WORKFLOW_PLACEHOLDER, SUBWORKFLOW_PREFIX, WorkflowKind, WorkflowUnit,
};
