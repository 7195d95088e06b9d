use super::registry::NodeRegistry;
use super::unit::{MAIN_WORKFLOW_NAME, WorkflowKind, WorkflowUnit};
use crate::status::{ToolCallOutcome, ToolCallStatus};
use indexmap::IndexMap;

/// Everything the model has built so far: the defined nodes, the sub-workflows and
/// `mainWorkflow`.
#[derive(Debug, Clone)]
pub struct Program {
    pub nodes: NodeRegistry,
    main: WorkflowUnit,
    subworkflows: IndexMap<String, WorkflowUnit>,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    pub fn new() -> Self {
        Self {
            nodes: NodeRegistry::new(),
            main: WorkflowUnit::main(),
            subworkflows: IndexMap::new(),
        }
    }

    pub fn main_workflow(&self) -> &WorkflowUnit {
        &self.main
    }

    pub fn subworkflow(&self, name: &str) -> Option<&WorkflowUnit> {
        self.subworkflows.get(name)
    }

    pub fn subworkflows(&self) -> impl Iterator<Item = &WorkflowUnit> {
        self.subworkflows.values()
    }

    /// Replaces the body of `mainWorkflow` or of a sub-workflow, adding the
    /// sub-workflow when it is new.
    pub fn implement_workflow(&mut self, name: &str, code: &str) -> ToolCallOutcome {
        match WorkflowKind::of(name) {
            Some(WorkflowKind::Main) => {
                self.main.code = code.to_string();
                ToolCallOutcome::success(format!("{} has been re-implemented", MAIN_WORKFLOW_NAME))
            }
            Some(WorkflowKind::Sub) => match self.subworkflows.get_mut(name) {
                Some(unit) => {
                    unit.code = code.to_string();
                    ToolCallOutcome::success(format!("{} has been re-implemented", name))
                }
                None => {
                    self.subworkflows
                        .insert(name.to_string(), WorkflowUnit::sub(name, code));
                    ToolCallOutcome::success(format!("{} has been added", name))
                }
            },
            None => ToolCallOutcome::failure(
                ToolCallStatus::InputTypeError,
                format!(
                    "Invalid workflow name \"{}\". All names must be \"{}\" or \"subworkflow_x\"",
                    name, MAIN_WORKFLOW_NAME
                ),
            ),
        }
    }

    /// The whole program: node blocks, then sub-workflows, then `mainWorkflow`.
    pub fn render(&self) -> String {
        self.render_with(false)
    }

    /// Same as [`Program::render`] without docstrings.
    pub fn render_clean(&self) -> String {
        self.render_with(true)
    }

    fn render_with(&self, clean: bool) -> String {
        let mut blocks: Vec<String> = self
            .nodes
            .iter()
            .map(|node| {
                let lines = if clean { node.render_clean() } else { node.render() };
                lines.join("\n")
            })
            .collect();
        for unit in self.subworkflows.values().chain(std::iter::once(&self.main)) {
            let body = if clean {
                unit.render_clean()
            } else {
                unit.render().to_string()
            };
            blocks.push(body.trim_matches('\n').to_string());
        }
        blocks.join("\n\n")
    }
}
