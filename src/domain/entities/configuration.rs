use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::repository::Repository;

/// `start_transition`未指定時のJira遷移ID（作業開始）
pub const DEFAULT_START_TRANSITION: &str = "4";

/// `done_transition`未指定時のJira遷移ID（レビュー待ち）
pub const DEFAULT_DONE_TRANSITION: &str = "861";

/// 課題管理システム（Jira）の認証情報
#[derive(Clone, PartialEq, Eq)]
pub struct IssueTrackerCredentials {
    /// サーバーURL
    pub server: String,

    /// ユーザー名
    pub username: String,

    /// パスワードまたはAPIトークン
    pub password: String,

    /// `branch`で適用する遷移ID
    pub start_transition: String,

    /// `done`で適用する遷移ID
    pub done_transition: String,
}

impl IssueTrackerCredentials {
    /// 新しい認証情報を作成
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: password.into(),
            start_transition: DEFAULT_START_TRANSITION.to_string(),
            done_transition: DEFAULT_DONE_TRANSITION.to_string(),
        }
    }

    /// 遷移IDを上書き
    pub fn with_transitions(
        mut self,
        start_transition: impl Into<String>,
        done_transition: impl Into<String>,
    ) -> Self {
        self.start_transition = start_transition.into();
        self.done_transition = done_transition.into();
        self
    }
}

// パスワードをログに出さない
impl std::fmt::Debug for IssueTrackerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssueTrackerCredentials")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"***")
            .field("start_transition", &self.start_transition)
            .field("done_transition", &self.done_transition)
            .finish()
    }
}

/// プロセス全体で共有される設定
///
/// 起動時に一度だけ読み込まれ、以後は参照として各コマンドに渡される。
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// 読み込んだ設定ファイルのパス
    pub config_path: PathBuf,

    /// エイリアス（呼び出し名 → コマンド名）
    pub aliases: HashMap<String, String>,

    /// Jiraの認証情報（`[jira]`セクションが無い場合はNone）
    pub issue_tracker: Option<IssueTrackerCredentials>,

    /// 対象リポジトリ（宣言順）
    pub repositories: Vec<Repository>,

    /// 各リポジトリの開始時にパス・SCM・リモートも表示するか
    pub verbose: bool,

    /// リポジトリ毎のタイムアウト
    pub timeout: Option<Duration>,
}

impl Configuration {
    /// 空の設定を作成
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            ..Default::default()
        }
    }

    /// エイリアスを追加
    pub fn with_alias(mut self, name: impl Into<String>, command: impl Into<String>) -> Self {
        self.aliases.insert(name.into(), command.into());
        self
    }

    /// リポジトリを追加
    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repositories.push(repository);
        self
    }

    /// Jiraの認証情報を設定
    pub fn with_issue_tracker(mut self, credentials: IssueTrackerCredentials) -> Self {
        self.issue_tracker = Some(credentials);
        self
    }

    /// 詳細ログフラグを設定
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// タイムアウトを設定
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 設定ファイルのパスを取得
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_builder() {
        let config = Configuration::new("/home/me/.jurc")
            .with_alias("st", "status")
            .with_repository(Repository::new("api", "/work/api"))
            .with_repository(Repository::new("api", "/work/api"))
            .with_verbose(true)
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.config_path(), Path::new("/home/me/.jurc"));
        assert_eq!(config.aliases.get("st").map(String::as_str), Some("status"));
        // 重複は許可される
        assert_eq!(config.repositories.len(), 2);
        assert!(config.verbose);
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert!(config.issue_tracker.is_none());
    }

    #[test]
    fn test_credentials_defaults() {
        let credentials = IssueTrackerCredentials::new("https://jira.example.com", "me", "secret");
        assert_eq!(credentials.start_transition, DEFAULT_START_TRANSITION);
        assert_eq!(credentials.done_transition, DEFAULT_DONE_TRANSITION);

        let custom = credentials.with_transitions("11", "21");
        assert_eq!(custom.start_transition, "11");
        assert_eq!(custom.done_transition, "21");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = IssueTrackerCredentials::new("https://jira.example.com", "me", "secret");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
    }
}
