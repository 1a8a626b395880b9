use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::context::CommandContext;
use crate::application::services::fan_out::RepositoryHandler;
use crate::common::error::JuError;
use crate::common::result::JuResult;
use crate::domain::entities::{Configuration, Repository};
use crate::infrastructure::scm::{ChangeKind, CommitOptions};

/// commitコマンドの設定
#[derive(Debug, Clone, Default)]
pub struct CommitConfig {
    /// コミットメッセージ（Noneの場合は最初のコミット時に入力させる）
    pub message: Option<String>,

    /// ブランチを閉じるか（Mercurialのみ）
    pub close_branch: bool,
}

impl CommitConfig {
    pub fn new(message: Option<String>) -> Self {
        Self {
            message,
            close_branch: false,
        }
    }

    pub fn with_close_branch(mut self, close_branch: bool) -> Self {
        self.close_branch = close_branch;
        self
    }
}

/// 全リポジトリの変更をコミットするユースケース
///
/// メッセージは1回の実行で1度だけ入力させ、全リポジトリで共有する。
pub struct CommitUseCase {
    context: Arc<CommandContext>,
    close_branch: bool,
    message: Mutex<Option<String>>,
}

impl CommitUseCase {
    pub fn new(context: Arc<CommandContext>, config: CommitConfig) -> Self {
        Self {
            context,
            close_branch: config.close_branch,
            message: Mutex::new(config.message),
        }
    }

    fn message(&self) -> JuResult<String> {
        let mut message = self
            .message
            .lock()
            .map_err(|_| JuError::internal_error("commit message lock poisoned"))?;

        if let Some(message) = message.as_ref() {
            return Ok(message.clone());
        }

        let entered = self.context.prompt_commit_message()?;
        *message = Some(entered.clone());
        Ok(entered)
    }
}

#[async_trait]
impl RepositoryHandler for CommitUseCase {
    async fn handle(&self, _config: &Configuration, repository: &Repository) -> anyhow::Result<()> {
        let scm = self.context.scm_for(repository);
        let ui = self.context.ui();

        let changes = self
            .context
            .pending_changes(scm.as_ref(), repository)
            .await?;
        if changes.is_empty() && !self.close_branch {
            ui.message("nothing changed");
            return Ok(());
        }

        let (untracked, tracked): (Vec<_>, Vec<_>) = changes
            .into_iter()
            .partition(|change| matches!(change.kind, ChangeKind::Untracked | ChangeKind::Missing));

        let addremove = if untracked.is_empty() {
            false
        } else {
            ui.show_changes(&untracked);
            ui.confirm("Add untracked and remove missing files?", true)?
        };

        if tracked.is_empty() && !addremove && !self.close_branch {
            ui.message("nothing to commit");
            return Ok(());
        }

        let options = CommitOptions::new(self.message()?)
            .with_addremove(addremove)
            .with_close_branch(self.close_branch);
        scm.commit(&repository.path, &options).await?;
        ui.success("commit was successful");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{context_with, RecordingUi};
    use crate::infrastructure::scm::{FileChange, MockScmOperations};

    fn repository(name: &str) -> Repository {
        Repository::new(name, format!("/work/{}", name))
    }

    #[tokio::test]
    async fn test_message_is_prompted_once_for_all_repositories() {
        let mut scm = MockScmOperations::new();
        scm.expect_status()
            .returning(|_| Ok(vec![FileChange::new(ChangeKind::Modified, "a.rs")]));
        scm.expect_commit()
            .withf(|_, options| options.message == "shared message" && !options.addremove)
            .times(2)
            .returning(|_, _| Ok(()));
        // 入力は1回分しか用意しない
        let (context, ui) =
            context_with(scm, RecordingUi::default().with_inputs(&["shared message"]));

        let use_case = CommitUseCase::new(context, CommitConfig::new(None));
        let config = Configuration::default();
        use_case.handle(&config, &repository("a")).await.unwrap();
        use_case.handle(&config, &repository("b")).await.unwrap();

        assert_eq!(ui.questions(), vec!["Commit message"]);
        assert_eq!(ui.successes().len(), 2);
    }

    #[tokio::test]
    async fn test_untracked_files_are_added_when_confirmed() {
        let mut scm = MockScmOperations::new();
        scm.expect_status().returning(|_| {
            Ok(vec![
                FileChange::new(ChangeKind::Modified, "a.rs"),
                FileChange::new(ChangeKind::Untracked, "b.rs"),
            ])
        });
        scm.expect_commit()
            .withf(|_, options| options.addremove)
            .times(1)
            .returning(|_, _| Ok(()));
        let (context, ui) = context_with(scm, RecordingUi::default().with_confirms(&[true]));

        CommitUseCase::new(context, CommitConfig::new(Some("msg".to_string())))
            .handle(&Configuration::default(), &repository("a"))
            .await
            .unwrap();

        assert_eq!(
            ui.changes(),
            vec![FileChange::new(ChangeKind::Untracked, "b.rs")]
        );
    }

    #[tokio::test]
    async fn test_only_untracked_and_declined_commits_nothing() {
        let mut scm = MockScmOperations::new();
        scm.expect_status()
            .returning(|_| Ok(vec![FileChange::new(ChangeKind::Untracked, "b.rs")]));
        scm.expect_commit().times(0);
        let (context, ui) = context_with(scm, RecordingUi::default().with_confirms(&[false]));

        CommitUseCase::new(context, CommitConfig::new(Some("msg".to_string())))
            .handle(&Configuration::default(), &repository("a"))
            .await
            .unwrap();

        assert_eq!(ui.messages(), vec!["nothing to commit"]);
    }

    #[tokio::test]
    async fn test_clean_working_copy_is_skipped() {
        let mut scm = MockScmOperations::new();
        scm.expect_status().returning(|_| Ok(vec![]));
        scm.expect_commit().times(0);
        let (context, ui) = context_with(scm, RecordingUi::default());

        CommitUseCase::new(context, CommitConfig::new(None))
            .handle(&Configuration::default(), &repository("a"))
            .await
            .unwrap();

        assert_eq!(ui.messages(), vec!["nothing changed"]);
        assert!(ui.questions().is_empty());
    }

    #[tokio::test]
    async fn test_close_branch_commits_without_changes() {
        let mut scm = MockScmOperations::new();
        scm.expect_status().returning(|_| Ok(vec![]));
        scm.expect_commit()
            .withf(|_, options| options.close_branch)
            .times(1)
            .returning(|_, _| Ok(()));
        let (context, _ui) = context_with(scm, RecordingUi::default());

        CommitUseCase::new(
            context,
            CommitConfig::new(Some("close".to_string())).with_close_branch(true),
        )
        .handle(&Configuration::default(), &repository("a"))
        .await
        .unwrap();
    }
}
