use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::context::CommandContext;
use crate::application::services::fan_out::RepositoryHandler;
use crate::domain::entities::{Configuration, Repository};

/// 作業コピーの状態を表示するユースケース
pub struct StatusUseCase {
    context: Arc<CommandContext>,
}

impl StatusUseCase {
    /// 新しいStatusUseCaseを作成
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RepositoryHandler for StatusUseCase {
    async fn handle(&self, _config: &Configuration, repository: &Repository) -> anyhow::Result<()> {
        let scm = self.context.scm_for(repository);
        let ui = self.context.ui();

        debug!("status of {}", repository.path.display());
        let branch = scm.current_branch(&repository.path).await?;
        ui.message(&format!("On branch {}", branch));

        let changes = self
            .context
            .pending_changes(scm.as_ref(), repository)
            .await?;
        if changes.is_empty() {
            ui.message("nothing to commit, working tree clean");
        } else {
            ui.message("Changes not staged for commit:");
            ui.show_changes(&changes);
        }

        Ok(())
    }
}
