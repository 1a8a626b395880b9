use clap::Parser;
use std::sync::Arc;

use super::RepositoryCommand;
use crate::application::services::fan_out::RepositoryHandler;
use crate::application::use_cases::status::StatusUseCase;
use crate::application::use_cases::CommandContext;

/// Show changed files in every repository
#[derive(Parser, Debug, Default)]
pub struct StatusArgs {}

impl RepositoryCommand for StatusArgs {
    fn into_handler(self, context: Arc<CommandContext>) -> Box<dyn RepositoryHandler> {
        Box::new(StatusUseCase::new(context))
    }
}
