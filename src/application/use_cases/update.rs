use async_trait::async_trait;
use std::sync::Arc;

use super::context::CommandContext;
use crate::application::services::fan_out::RepositoryHandler;
use crate::domain::entities::{Configuration, Repository};

/// updateコマンドの設定
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// 更新先のブランチまたはリビジョン
    pub revision: String,

    /// 未コミットの変更を破棄するか
    pub clean: bool,
}

impl UpdateConfig {
    pub fn new(revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
            clean: false,
        }
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }
}

/// 作業コピーを指定したブランチへ更新するユースケース
///
/// 未コミットの変更がある場合は、確認の上でコミットとpushを先に行う。
pub struct UpdateUseCase {
    context: Arc<CommandContext>,
    config: UpdateConfig,
}

impl UpdateUseCase {
    pub fn new(context: Arc<CommandContext>, config: UpdateConfig) -> Self {
        Self { context, config }
    }
}

#[async_trait]
impl RepositoryHandler for UpdateUseCase {
    async fn handle(&self, _config: &Configuration, repository: &Repository) -> anyhow::Result<()> {
        let scm = self.context.scm_for(repository);
        let ui = self.context.ui();

        // --clean では変更を破棄するので確認しない
        if !self.config.clean {
            let changes = self
                .context
                .pending_changes(scm.as_ref(), repository)
                .await?;
            if !changes.is_empty() {
                ui.show_changes(&changes);
                if ui.confirm("Commit and push these changes before updating?", false)? {
                    self.context
                        .commit_with_prompt(scm.as_ref(), repository)
                        .await?;
                    self.context
                        .push_to_remote(scm.as_ref(), repository, None)
                        .await?;
                }
            }
        }

        self.context.pull_if_incoming(scm.as_ref(), repository).await?;

        let stats = scm
            .update(&repository.path, &self.config.revision, self.config.clean)
            .await?;
        ui.message(&format!("updated to {}", self.config.revision));
        if let Some(stats) = stats {
            ui.message(&stats.to_string());
        }

        Ok(())
    }
}
