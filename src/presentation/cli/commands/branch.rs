use clap::Parser;
use std::sync::Arc;

use super::RepositoryCommand;
use crate::application::services::fan_out::RepositoryHandler;
use crate::application::use_cases::branch::{BranchConfig, BranchUseCase};
use crate::application::use_cases::CommandContext;

/// Show the current branch, or switch every repository to a branch
///
/// A branch named after a Jira issue (`PROJ-123`) assigns the issue to you
/// and starts progress on it.
#[derive(Parser, Debug, Default)]
pub struct BranchArgs {
    /// Branch to switch to or create
    pub name: Option<String>,

    /// Discard uncommitted changes when updating to the default branch
    #[arg(short = 'C', long)]
    pub clean: bool,
}

impl RepositoryCommand for BranchArgs {
    fn into_handler(self, context: Arc<CommandContext>) -> Box<dyn RepositoryHandler> {
        let config = BranchConfig::new(self.name).with_clean(self.clean);
        Box::new(BranchUseCase::new(context, config))
    }
}
