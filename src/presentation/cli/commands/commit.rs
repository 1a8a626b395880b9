use clap::Parser;
use std::sync::Arc;

use super::RepositoryCommand;
use crate::application::services::fan_out::RepositoryHandler;
use crate::application::use_cases::commit::{CommitConfig, CommitUseCase};
use crate::application::use_cases::CommandContext;

/// Commit outstanding changes in every repository
///
/// Without `--message` the message is asked for once and reused.
#[derive(Parser, Debug, Default)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,

    /// Mark the branch as closed (Mercurial only)
    #[arg(long)]
    pub close_branch: bool,
}

impl RepositoryCommand for CommitArgs {
    fn into_handler(self, context: Arc<CommandContext>) -> Box<dyn RepositoryHandler> {
        let config = CommitConfig::new(self.message).with_close_branch(self.close_branch);
        Box::new(CommitUseCase::new(context, config))
    }
}
