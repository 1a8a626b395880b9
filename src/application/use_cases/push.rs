use async_trait::async_trait;
use std::sync::Arc;

use super::context::CommandContext;
use crate::application::services::fan_out::RepositoryHandler;
use crate::domain::entities::{Configuration, Repository};

/// 変更をリモートへpushするユースケース
///
/// 未コミットの変更があれば、確認（既定はYes）の上で先にコミットする。
pub struct PushUseCase {
    context: Arc<CommandContext>,
    branch: Option<String>,
}

impl PushUseCase {
    pub fn new(context: Arc<CommandContext>, branch: Option<String>) -> Self {
        Self { context, branch }
    }
}

#[async_trait]
impl RepositoryHandler for PushUseCase {
    async fn handle(&self, _config: &Configuration, repository: &Repository) -> anyhow::Result<()> {
        let scm = self.context.scm_for(repository);
        let ui = self.context.ui();

        let changes = self
            .context
            .pending_changes(scm.as_ref(), repository)
            .await?;
        if !changes.is_empty() {
            ui.show_changes(&changes);
            if ui.confirm("Commit these changes before pushing?", true)? {
                self.context
                    .commit_with_prompt(scm.as_ref(), repository)
                    .await?;
            }
        }

        self.context
            .push_to_remote(scm.as_ref(), repository, self.branch.as_deref())
            .await?;
        Ok(())
    }
}
