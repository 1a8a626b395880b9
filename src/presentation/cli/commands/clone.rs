use clap::Parser;
use std::sync::Arc;

use super::RepositoryCommand;
use crate::application::services::fan_out::RepositoryHandler;
use crate::application::use_cases::clone::CloneUseCase;
use crate::application::use_cases::CommandContext;

/// Clone every configured repository that is not checked out yet
#[derive(Parser, Debug, Default)]
pub struct CloneArgs {}

impl RepositoryCommand for CloneArgs {
    fn into_handler(self, context: Arc<CommandContext>) -> Box<dyn RepositoryHandler> {
        Box::new(CloneUseCase::new(context))
    }
}
