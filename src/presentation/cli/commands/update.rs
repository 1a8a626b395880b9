use clap::Parser;
use std::sync::Arc;

use super::RepositoryCommand;
use crate::application::services::fan_out::RepositoryHandler;
use crate::application::use_cases::update::{UpdateConfig, UpdateUseCase};
use crate::application::use_cases::CommandContext;

/// Pull and update every repository to a branch or revision
#[derive(Parser, Debug, Default)]
pub struct UpdateArgs {
    /// Branch or revision to update to
    pub name: String,

    /// Discard uncommitted changes instead of offering to commit them
    #[arg(short = 'C', long)]
    pub clean: bool,
}

impl RepositoryCommand for UpdateArgs {
    fn into_handler(self, context: Arc<CommandContext>) -> Box<dyn RepositoryHandler> {
        let config = UpdateConfig::new(self.name).with_clean(self.clean);
        Box::new(UpdateUseCase::new(context, config))
    }
}
