use clap::Parser;
use std::sync::Arc;

use super::RepositoryCommand;
use crate::application::services::fan_out::RepositoryHandler;
use crate::application::use_cases::diff::DiffUseCase;
use crate::application::use_cases::CommandContext;

/// Show uncommitted changes in every repository
#[derive(Parser, Debug, Default)]
pub struct DiffArgs {}

impl RepositoryCommand for DiffArgs {
    fn into_handler(self, context: Arc<CommandContext>) -> Box<dyn RepositoryHandler> {
        Box::new(DiffUseCase::new(context))
    }
}
