use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Where `ask_user_help` questions go.
pub trait HumanChannel {
    fn ask_for_help(&mut self, problems: &str) -> String;
}

/// Where `task_submit` summaries go.
pub trait ResultSink {
    fn submit(&mut self, summary: &str);
}

impl<T: HumanChannel + ?Sized> HumanChannel for &mut T {
    fn ask_for_help(&mut self, problems: &str) -> String {
        (**self).ask_for_help(problems)
    }
}

impl<T: ResultSink + ?Sized> ResultSink for &mut T {
    fn submit(&mut self, summary: &str) {
        (**self).submit(summary)
    }
}

/// Never answers.
#[derive(Debug, Default)]
pub struct SilentHuman;

impl HumanChannel for SilentHuman {
    fn ask_for_help(&mut self, _problems: &str) -> String {
        String::new()
    }
}

/// Answers from a prepared queue, then falls silent.
#[derive(Debug, Default)]
pub struct ScriptedHuman {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedHuman {
    pub fn new(answers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

impl HumanChannel for ScriptedHuman {
    fn ask_for_help(&mut self, problems: &str) -> String {
        self.asked.push(problems.to_string());
        self.answers.pop_front().unwrap_or_default()
    }
}

/// Keeps every submitted summary.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub submitted: Vec<String>,
}

impl ResultSink for MemorySink {
    fn submit(&mut self, summary: &str) {
        self.submitted.push(summary.to_string());
    }
}

/// Writes the latest summary to a markdown file.
#[derive(Debug, Clone)]
pub struct MarkdownFileSink {
    path: PathBuf,
}

impl MarkdownFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for MarkdownFileSink {
    fn submit(&mut self, summary: &str) {
        if let Err(error) = fs::write(&self.path, summary) {
            warn!(path = %self.path.display(), %error, "Could not save submitted result");
        }
    }
}
