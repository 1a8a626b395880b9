use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::context::CommandContext;
use crate::application::services::fan_out::RepositoryHandler;
use crate::domain::entities::{Configuration, Repository};
use crate::domain::value_objects::branch_name::BranchName;

/// branchコマンドの設定
#[derive(Debug, Clone, Default)]
pub struct BranchConfig {
    /// 作成・切り替え先のブランチ（Noneの場合は現在のブランチを表示）
    pub name: Option<String>,

    /// 未コミットの変更を破棄して更新するか
    pub clean: bool,
}

impl BranchConfig {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// 変更破棄フラグを設定
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }
}

/// ブランチの表示・作成を行うユースケース
///
/// ブランチ名が課題キーであればJiraの課題を自分に割り当て、作業開始の遷移を行う。
/// その後、既定ブランチへ更新してからブランチを作成（既存なら切り替え）する。
/// 途中で失敗しても、それまでの変更は元に戻さない。
pub struct BranchUseCase {
    context: Arc<CommandContext>,
    config: BranchConfig,
}

impl BranchUseCase {
    pub fn new(context: Arc<CommandContext>, config: BranchConfig) -> Self {
        Self { context, config }
    }
}

#[async_trait]
impl RepositoryHandler for BranchUseCase {
    async fn handle(&self, _config: &Configuration, repository: &Repository) -> anyhow::Result<()> {
        let scm = self.context.scm_for(repository);
        let ui = self.context.ui();
        let path = &repository.path;

        let Some(name) = &self.config.name else {
            let current = scm.current_branch(path).await?;
            ui.message(&format!("Current branch: {}", current));
            return Ok(());
        };

        let branch = BranchName::new(name)?;

        // 1. Jira
        if let (Some(workflow), Some(key)) = (self.context.issue_workflow(), branch.issue_key()) {
            let outcome = workflow.start_work(&key).await?;
            self.context
                .report_transition(&key, workflow.start_transition(), &outcome);
        }

        // 2. 取り込み
        self.context.pull_if_incoming(scm.as_ref(), repository).await?;

        // 3. 既定ブランチへ更新
        let default_branch = repository.default_branch();
        debug!("updating {} to {}", repository.name, default_branch);
        let mut stats = scm.update(path, &default_branch, self.config.clean).await?;

        // 4. 作成または切り替え
        if scm.branch_exists(path, branch.as_str()).await? {
            stats = scm.update(path, branch.as_str(), false).await?.or(stats);
            ui.message(&format!("switched to branch {}", branch));
        } else {
            scm.create_branch(path, branch.as_str()).await?;
            ui.message(&format!("marked working directory as branch {}", branch));
        }

        if let Some(stats) = stats {
            ui.message(&stats.to_string());
        }

        Ok(())
    }
}
