use std::sync::Arc;

use crate::application::services::issue_workflow::{IssueWorkflow, TransitionOutcome};
use crate::common::error::JuError;
use crate::common::result::JuResult;
use crate::domain::entities::Repository;
use crate::infrastructure::scm::{
    ChangeKind, CommitOptions, FileChange, PushOptions, PushOutcome, ScmOperations, ScmProvider,
};

/// コマンドが利用するユーザーインターフェース
///
/// 端末向けの実装はpresentation層にあり、テストでは記録用の実装を使う。
pub trait UserInterface: Send + Sync {
    /// 通常のメッセージ
    fn message(&self, msg: &str);

    /// 成功メッセージ
    fn success(&self, msg: &str);

    /// 警告メッセージ
    fn warning(&self, msg: &str);

    /// 変更ファイルの一覧
    fn show_changes(&self, changes: &[FileChange]);

    /// 差分
    fn show_diff(&self, diff: &str);

    /// Yes/Noの確認
    fn confirm(&self, question: &str, default: bool) -> JuResult<bool>;

    /// 文字列の入力
    fn input(&self, question: &str) -> JuResult<String>;
}

/// 全コマンドで共有される実行時の依存関係
pub struct CommandContext {
    scm_provider: Arc<dyn ScmProvider>,
    ui: Arc<dyn UserInterface>,
    issue_workflow: Option<IssueWorkflow>,
}

impl CommandContext {
    /// 新しいCommandContextを作成
    pub fn new(scm_provider: Arc<dyn ScmProvider>, ui: Arc<dyn UserInterface>) -> Self {
        Self {
            scm_provider,
            ui,
            issue_workflow: None,
        }
    }

    /// Jira連携を有効化
    pub fn with_issue_workflow(mut self, workflow: IssueWorkflow) -> Self {
        self.issue_workflow = Some(workflow);
        self
    }

    /// リポジトリに対応するSCM実装
    pub fn scm_for(&self, repository: &Repository) -> Arc<dyn ScmOperations> {
        self.scm_provider.scm_for(repository)
    }

    pub fn ui(&self) -> &dyn UserInterface {
        self.ui.as_ref()
    }

    /// Jira連携（未設定の場合はNone）
    pub fn issue_workflow(&self) -> Option<&IssueWorkflow> {
        self.issue_workflow.as_ref()
    }

    /// コミット対象になりうる変更（clean/ignoredを除く）
    pub async fn pending_changes(
        &self,
        scm: &dyn ScmOperations,
        repository: &Repository,
    ) -> anyhow::Result<Vec<FileChange>> {
        let changes = scm.status(&repository.path).await?;
        Ok(changes
            .into_iter()
            .filter(|change| !matches!(change.kind, ChangeKind::Clean | ChangeKind::Ignored))
            .collect())
    }

    /// 取り込むべき変更があればpullする
    pub async fn pull_if_incoming(
        &self,
        scm: &dyn ScmOperations,
        repository: &Repository,
    ) -> anyhow::Result<bool> {
        if !scm.incoming(&repository.path).await? {
            return Ok(false);
        }

        if let Some(remote) = scm.default_remote(&repository.path).await? {
            self.ui.message(&format!("comparing with {}", remote));
        }
        scm.pull(&repository.path).await?;
        Ok(true)
    }

    /// コミットメッセージを入力させる
    pub fn prompt_commit_message(&self) -> JuResult<String> {
        let message = self.ui.input("Commit message")?;
        let message = message.trim();
        if message.is_empty() {
            return Err(JuError::prompt_error("commit message cannot be empty"));
        }
        Ok(message.to_string())
    }

    /// メッセージを入力させ、追加・削除を含めてコミット
    pub async fn commit_with_prompt(
        &self,
        scm: &dyn ScmOperations,
        repository: &Repository,
    ) -> anyhow::Result<()> {
        let message = self.prompt_commit_message()?;
        let options = CommitOptions::new(message).with_addremove(true);
        scm.commit(&repository.path, &options).await?;
        self.ui.success("commit was successful");
        Ok(())
    }

    /// リポジトリのリモートへpushし、結果を表示
    pub async fn push_to_remote(
        &self,
        scm: &dyn ScmOperations,
        repository: &Repository,
        branch: Option<&str>,
    ) -> anyhow::Result<PushOutcome> {
        let options = PushOptions {
            dest: repository.remote.clone(),
            branch: branch.map(str::to_string),
            new_branch: true,
        };

        let outcome = scm.push(&repository.path, &options).await?;
        match outcome {
            PushOutcome::Pushed => self.ui.success("push was successful"),
            PushOutcome::NothingToPush => self.ui.message("nothing to push"),
        }
        Ok(outcome)
    }

    /// 遷移の結果を表示
    pub fn report_transition(&self, key: &str, transition_id: &str, outcome: &TransitionOutcome) {
        match outcome {
            TransitionOutcome::Applied(name) => self.ui.success(&format!("{}: {}", key, name)),
            TransitionOutcome::Unavailable => self.ui.warning(&format!(
                "{}: transition {} is not available",
                key, transition_id
            )),
            TransitionOutcome::AlreadyHandled => {}
        }
    }
}
