//! Test doubles shared by the use case tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::context::{CommandContext, UserInterface};
use crate::common::error::JuError;
use crate::common::result::JuResult;
use crate::domain::entities::Repository;
use crate::infrastructure::scm::{FileChange, MockScmOperations, ScmOperations, ScmProvider};

/// Hands out the same SCM for every repository
pub(crate) struct FixedScmProvider(pub Arc<dyn ScmOperations>);

impl ScmProvider for FixedScmProvider {
    fn scm_for(&self, _repository: &Repository) -> Arc<dyn ScmOperations> {
        self.0.clone()
    }
}

/// Captures output and answers prompts from queued responses.
///
/// Confirmations fall back to the prompt's default once the queue is empty;
/// inputs fail instead so a missing response is visible in the test.
#[derive(Debug, Default)]
pub(crate) struct RecordingUi {
    messages: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
    changes: Mutex<Vec<FileChange>>,
    diffs: Mutex<Vec<String>>,
    questions: Mutex<Vec<String>>,
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
}

impl RecordingUi {
    pub fn with_confirms(self, answers: &[bool]) -> Self {
        self.confirms.lock().unwrap().extend(answers.iter().copied());
        self
    }

    pub fn with_inputs(self, answers: &[&str]) -> Self {
        self.inputs
            .lock()
            .unwrap()
            .extend(answers.iter().map(|a| a.to_string()));
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn changes(&self) -> Vec<FileChange> {
        self.changes.lock().unwrap().clone()
    }

    pub fn diffs(&self) -> Vec<String> {
        self.diffs.lock().unwrap().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl UserInterface for RecordingUi {
    fn message(&self, msg: &str) {
        self.messages.lock().unwrap().push(msg.to_string());
    }

    fn success(&self, msg: &str) {
        self.successes.lock().unwrap().push(msg.to_string());
    }

    fn warning(&self, msg: &str) {
        self.warnings.lock().unwrap().push(msg.to_string());
    }

    fn show_changes(&self, changes: &[FileChange]) {
        self.changes.lock().unwrap().extend_from_slice(changes);
    }

    fn show_diff(&self, diff: &str) {
        self.diffs.lock().unwrap().push(diff.to_string());
    }

    fn confirm(&self, question: &str, default: bool) -> JuResult<bool> {
        self.questions.lock().unwrap().push(question.to_string());
        Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(default))
    }

    fn input(&self, question: &str) -> JuResult<String> {
        self.questions.lock().unwrap().push(question.to_string());
        self.inputs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| JuError::prompt_error(format!("no scripted answer for '{}'", question)))
    }
}

/// Build a context around a mocked SCM and a recording UI
pub(crate) fn context_with(
    scm: MockScmOperations,
    ui: RecordingUi,
) -> (Arc<CommandContext>, Arc<RecordingUi>) {
    let ui = Arc::new(ui);
    let context = CommandContext::new(Arc::new(FixedScmProvider(Arc::new(scm))), ui.clone());
    (Arc::new(context), ui)
}

/// Same as [`context_with`], with Jira enabled
pub(crate) fn context_with_workflow(
    scm: MockScmOperations,
    ui: RecordingUi,
    workflow: crate::application::services::issue_workflow::IssueWorkflow,
) -> (Arc<CommandContext>, Arc<RecordingUi>) {
    let ui = Arc::new(ui);
    let context = CommandContext::new(Arc::new(FixedScmProvider(Arc::new(scm))), ui.clone())
        .with_issue_workflow(workflow);
    (Arc::new(context), ui)
}
