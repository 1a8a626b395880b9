use clap::Parser;
use std::sync::Arc;

use super::RepositoryCommand;
use crate::application::services::fan_out::RepositoryHandler;
use crate::application::use_cases::push::PushUseCase;
use crate::application::use_cases::CommandContext;

/// Push every repository to its configured remote
#[derive(Parser, Debug, Default)]
pub struct PushArgs {
    /// Only push this branch
    pub branch: Option<String>,
}

impl RepositoryCommand for PushArgs {
    fn into_handler(self, context: Arc<CommandContext>) -> Box<dyn RepositoryHandler> {
        Box::new(PushUseCase::new(context, self.branch))
    }
}
