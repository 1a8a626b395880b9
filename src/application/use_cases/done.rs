use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::context::CommandContext;
use crate::application::services::fan_out::RepositoryHandler;
use crate::application::services::issue_workflow::issue_key_for_branch;
use crate::common::error::JuError;
use crate::common::result::JuResult;
use crate::domain::entities::{Configuration, Repository};

/// doneコマンドの設定
#[derive(Debug, Clone, Default)]
pub struct DoneConfig {
    /// 対象ブランチ（Noneの場合は現在のブランチ）
    pub branch: Option<String>,

    /// 開始時の確認を省略するか
    pub assume_yes: bool,
}

impl DoneConfig {
    pub fn new(branch: Option<String>) -> Self {
        Self {
            branch,
            assume_yes: false,
        }
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }
}

/// 作業を完了させるユースケース
///
/// 変更をコミットしてpushし、課題をレビュー待ちへ遷移させる。
/// リポジトリ毎の確認で「No」を選ぶと、そのリポジトリだけ中断する。
pub struct DoneUseCase {
    context: Arc<CommandContext>,
    config: DoneConfig,
}

impl DoneUseCase {
    pub fn new(context: Arc<CommandContext>, config: DoneConfig) -> Self {
        Self { context, config }
    }

    /// 全リポジトリに対して実行してよいか確認する（`--yes`で省略）
    pub fn confirm_start(&self, config: &Configuration) -> JuResult<bool> {
        if self.config.assume_yes || config.repositories.is_empty() {
            return Ok(true);
        }

        let question = match &self.config.branch {
            Some(branch) => format!(
                "Finish {} in {} repositories?",
                branch,
                config.repositories.len()
            ),
            None => format!(
                "Finish the current branch in {} repositories?",
                config.repositories.len()
            ),
        };
        self.context.ui().confirm(&question, false)
    }
}

#[async_trait]
impl RepositoryHandler for DoneUseCase {
    async fn handle(&self, _config: &Configuration, repository: &Repository) -> anyhow::Result<()> {
        let scm = self.context.scm_for(repository);
        let ui = self.context.ui();

        let branch = match &self.config.branch {
            Some(branch) => branch.clone(),
            None => scm.current_branch(&repository.path).await?,
        };

        let changes = self
            .context
            .pending_changes(scm.as_ref(), repository)
            .await?;
        if !changes.is_empty() {
            ui.show_changes(&changes);
            if !ui.confirm("Commit and push these changes?", true)? {
                return Err(JuError::Aborted.into());
            }
            self.context
                .commit_with_prompt(scm.as_ref(), repository)
                .await?;
            self.context
                .push_to_remote(scm.as_ref(), repository, Some(&branch))
                .await?;
        }

        let Some(workflow) = self.context.issue_workflow() else {
            debug!("Jira is not configured");
            return Ok(());
        };
        let Some(key) = issue_key_for_branch(&branch) else {
            return Ok(());
        };
        if workflow.is_handled(&key) {
            return Ok(());
        }

        let issue = workflow.fetch(&key).await?;
        if let Some(assignee) = issue.assignee.as_deref() {
            if !issue.is_assigned_to(workflow.username()) {
                let question = format!("{} is assigned to {}. Continue?", key, assignee);
                if !ui.confirm(&question, false)? {
                    return Err(JuError::Aborted.into());
                }
            }
        }

        let outcome = workflow.finish_work(&key).await?;
        self.context
            .report_transition(&key, workflow.done_transition(), &outcome);
        Ok(())
    }
}
