use regex::Regex;
use std::sync::LazyLock;

pub const MAIN_WORKFLOW_NAME: &str = "mainWorkflow";
pub const SUBWORKFLOW_PREFIX: &str = "subworkflow_";

/// The body `mainWorkflow` starts with, until the model implements it.
pub const MAIN_WORKFLOW_PLACEHOLDER: &str = r#"
def mainWorkflow(trigger_input: [{...}]):
  """
  comments: You need to give comments when implementing mainWorkflow
  TODOs:
    - first define some actions
    - define a trigger
    - then implement this
  """
  print("Please call Workflow-implement first")
  raise NotImplementedError
"#;

static DOCSTRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)""".*?""""#).expect("docstring pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Main,
    Sub,
}

impl WorkflowKind {
    /// Classifies a workflow name; anything but `mainWorkflow` and `subworkflow_<x>`
    /// is not a valid unit name.
    pub fn of(name: &str) -> Option<Self> {
        if name == MAIN_WORKFLOW_NAME {
            Some(WorkflowKind::Main)
        } else if name.len() > SUBWORKFLOW_PREFIX.len() && name.starts_with(SUBWORKFLOW_PREFIX) {
            Some(WorkflowKind::Sub)
        } else {
            None
        }
    }
}

/// A free-text workflow body written by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowUnit {
    pub name: String,
    pub kind: WorkflowKind,
    pub code: String,
}

impl WorkflowUnit {
    pub fn main() -> Self {
        Self {
            name: MAIN_WORKFLOW_NAME.to_string(),
            kind: WorkflowKind::Main,
            code: MAIN_WORKFLOW_PLACEHOLDER.to_string(),
        }
    }

    pub fn sub(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: WorkflowKind::Sub,
            code: code.into(),
        }
    }

    pub fn render(&self) -> &str {
        &self.code
    }

    /// The body with every triple-quoted block removed.
    pub fn render_clean(&self) -> String {
        DOCSTRING.replace_all(&self.code, "").into_owned()
    }
}
