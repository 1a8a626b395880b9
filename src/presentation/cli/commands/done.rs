use clap::Parser;
use std::sync::Arc;

use crate::application::use_cases::done::{DoneConfig, DoneUseCase};
use crate::application::use_cases::CommandContext;

/// Commit and push a branch, then move its Jira issue to review
#[derive(Parser, Debug, Default)]
pub struct DoneArgs {
    /// Branch to finish; defaults to the current branch of each repository
    pub branch: Option<String>,

    /// Don't ask before starting
    #[arg(short, long)]
    pub yes: bool,
}

impl DoneArgs {
    /// `done` asks once before touching any repository, so the CLI needs the
    /// concrete use case rather than a boxed handler.
    pub fn into_use_case(self, context: Arc<CommandContext>) -> DoneUseCase {
        let config = DoneConfig::new(self.branch).with_assume_yes(self.yes);
        DoneUseCase::new(context, config)
    }
}
