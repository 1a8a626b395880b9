use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::domain::entities::configuration::IssueTrackerCredentials;
use crate::domain::value_objects::branch_name::BranchName;
use crate::infrastructure::issue_tracker::{Issue, IssueTracker, IssueTrackerError};

/// 遷移の適用結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// 遷移を適用した（遷移名）
    Applied(String),
    /// 現在の状態からは選択できない遷移だった
    Unavailable,
    /// 同じ実行内で既に処理済み
    AlreadyHandled,
}

/// ブランチ名から課題キーを取り出す
///
/// 課題キーの形式（`PROJ-123`）でないブランチはJira連携の対象外。
pub fn issue_key_for_branch(branch: &str) -> Option<String> {
    let key = BranchName::new(branch).ok()?.issue_key();
    if key.is_none() {
        debug!("Branch '{}' is not an issue key; skipping Jira", branch);
    }
    key
}

/// `branch`/`done`で共有するJira操作
///
/// 複数のリポジトリが同じ課題のブランチを持つことがあるため、
/// 1回の実行で遷移を適用した課題を記録し、二重に適用しない。
pub struct IssueWorkflow {
    tracker: Arc<dyn IssueTracker>,
    credentials: IssueTrackerCredentials,
    handled: Mutex<HashSet<String>>,
}

impl IssueWorkflow {
    /// 新しいIssueWorkflowを作成
    pub fn new(tracker: Arc<dyn IssueTracker>, credentials: IssueTrackerCredentials) -> Self {
        Self {
            tracker,
            credentials,
            handled: Mutex::new(HashSet::new()),
        }
    }

    /// この実行で既に遷移を適用した課題か
    pub fn is_handled(&self, key: &str) -> bool {
        self.handled
            .lock()
            .map(|handled| handled.contains(key))
            .unwrap_or(false)
    }

    fn mark_handled(&self, key: &str) {
        if let Ok(mut handled) = self.handled.lock() {
            handled.insert(key.to_string());
        }
    }

    /// ログインユーザー名
    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// `branch`で適用する遷移ID
    pub fn start_transition(&self) -> &str {
        &self.credentials.start_transition
    }

    /// `done`で適用する遷移ID
    pub fn done_transition(&self) -> &str {
        &self.credentials.done_transition
    }

    /// 課題を取得
    pub async fn fetch(&self, key: &str) -> Result<Issue, IssueTrackerError> {
        self.tracker.issue(key).await
    }

    /// 担当者が自分でなければ自分に割り当てる
    ///
    /// 割り当てを行った場合は`true`を返す。
    pub async fn ensure_assigned(&self, issue: &Issue) -> Result<bool, IssueTrackerError> {
        if issue.is_assigned_to(self.username()) {
            return Ok(false);
        }

        info!("Assigning {} to {}", issue.key, self.username());
        self.tracker
            .assign_issue(&issue.key, self.username())
            .await?;
        Ok(true)
    }

    /// 遷移IDが選択可能であれば適用する
    pub async fn apply_transition(
        &self,
        key: &str,
        transition_id: &str,
    ) -> Result<TransitionOutcome, IssueTrackerError> {
        let transitions = self.tracker.transitions(key).await?;

        let Some(transition) = transitions.into_iter().find(|t| t.id == transition_id) else {
            warn!(
                "Transition {} is not available for {}; leaving the issue as is",
                transition_id, key
            );
            return Ok(TransitionOutcome::Unavailable);
        };

        self.tracker.transition_issue(key, &transition.id).await?;
        Ok(TransitionOutcome::Applied(transition.name))
    }

    /// 作業開始: 自分に割り当て、開始遷移を適用
    pub async fn start_work(&self, key: &str) -> Result<TransitionOutcome, IssueTrackerError> {
        if self.is_handled(key) {
            return Ok(TransitionOutcome::AlreadyHandled);
        }

        let issue = self.fetch(key).await?;
        self.ensure_assigned(&issue).await?;
        let outcome = self
            .apply_transition(&issue.key, &self.credentials.start_transition)
            .await?;
        self.mark_handled(key);
        Ok(outcome)
    }

    /// 作業完了: 完了遷移を適用
    pub async fn finish_work(&self, key: &str) -> Result<TransitionOutcome, IssueTrackerError> {
        if self.is_handled(key) {
            return Ok(TransitionOutcome::AlreadyHandled);
        }

        let outcome = self
            .apply_transition(key, &self.credentials.done_transition)
            .await?;
        self.mark_handled(key);
        Ok(outcome)
    }
}
