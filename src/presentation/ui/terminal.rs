use console::Term;

use super::display::DisplayHelper;
use super::prompts;
use crate::application::services::fan_out::ExecutionReporter;
use crate::application::use_cases::UserInterface;
use crate::common::result::JuResult;
use crate::domain::entities::Repository;
use crate::infrastructure::scm::FileChange;

/// Terminal implementation of the command output and prompts
///
/// Regular output goes to stdout; repository failures and prompts use stderr.
pub struct TerminalUi {
    display: DisplayHelper,
    prompt_term: Term,
}

impl TerminalUi {
    pub fn new(use_color: bool) -> Self {
        Self {
            display: DisplayHelper::new(use_color),
            prompt_term: Term::stderr(),
        }
    }
}

impl UserInterface for TerminalUi {
    fn message(&self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&self, msg: &str) {
        println!("{}", self.display.success(msg));
    }

    fn warning(&self, msg: &str) {
        println!("{}", self.display.warning(msg));
    }

    fn show_changes(&self, changes: &[FileChange]) {
        for change in changes {
            println!("{}", self.display.change(change));
        }
    }

    fn show_diff(&self, diff: &str) {
        println!("{}", self.display.diff(diff));
    }

    fn confirm(&self, question: &str, default: bool) -> JuResult<bool> {
        prompts::confirm(question, default, &self.prompt_term)
    }

    fn input(&self, question: &str) -> JuResult<String> {
        prompts::input(question, &self.prompt_term)
    }
}

impl ExecutionReporter for TerminalUi {
    fn repository_started(&self, repository: &Repository) {
        println!("{}", self.display.repository_header(&repository.name));
    }

    fn repository_details(&self, repository: &Repository) {
        println!(
            "{}",
            self.display
                .detail("path", &repository.path.display().to_string())
        );
        println!(
            "{}",
            self.display.detail("scm", &repository.scm_type().to_string())
        );
        if let Some(remote) = &repository.remote {
            println!("{}", self.display.detail("remote", remote));
        }
    }

    fn repository_succeeded(&self, repository: &Repository) {
        println!("{}", self.display.success(&repository.name));
    }

    fn repository_failed(&self, repository: &Repository, error: &anyhow::Error) {
        eprintln!(
            "{}",
            self.display
                .error(&format!("{}: {:#}", repository.name, error))
        );
    }
}
