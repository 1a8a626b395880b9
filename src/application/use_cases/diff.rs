use async_trait::async_trait;
use std::sync::Arc;

use super::context::CommandContext;
use crate::application::services::fan_out::RepositoryHandler;
use crate::domain::entities::{Configuration, Repository};

/// 作業コピーの差分を表示するユースケース
pub struct DiffUseCase {
    context: Arc<CommandContext>,
}

impl DiffUseCase {
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RepositoryHandler for DiffUseCase {
    async fn handle(&self, _config: &Configuration, repository: &Repository) -> anyhow::Result<()> {
        let scm = self.context.scm_for(repository);
        let diff = scm.diff(&repository.path).await?;

        if diff.trim().is_empty() {
            self.context.ui().message("no changes");
        } else {
            self.context.ui().show_diff(&diff);
        }

        Ok(())
    }
}
