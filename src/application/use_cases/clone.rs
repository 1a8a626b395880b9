use anyhow::bail;
use async_trait::async_trait;
use std::sync::Arc;

use super::context::CommandContext;
use crate::application::services::fan_out::RepositoryHandler;
use crate::domain::entities::{Configuration, Repository};

/// 設定されたリポジトリをcloneするユースケース
pub struct CloneUseCase {
    context: Arc<CommandContext>,
}

impl CloneUseCase {
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RepositoryHandler for CloneUseCase {
    async fn handle(&self, _config: &Configuration, repository: &Repository) -> anyhow::Result<()> {
        let scm = self.context.scm_for(repository);
        let ui = self.context.ui();

        let Some(remote) = &repository.remote else {
            bail!("no remote configured for '{}'", repository.name);
        };

        if scm.is_repository(&repository.path) {
            ui.warning(&format!(
                "{} already exists, skipping",
                repository.path.display()
            ));
            return Ok(());
        }

        scm.check_availability().await?;
        scm.clone_repository(remote, &repository.path).await?;

        if !scm.is_repository(&repository.path) {
            bail!(
                "clone finished but {} is not a working copy",
                repository.path.display()
            );
        }

        ui.success("clone was successful");
        Ok(())
    }
}
