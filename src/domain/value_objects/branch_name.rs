use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// BranchName関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum BranchNameError {
    #[error("Branch name cannot be empty")]
    Empty,

    #[error("Branch name too long: {0} characters (max: 255)")]
    TooLong(usize),

    #[error("Invalid character in branch name: {0}")]
    InvalidCharacter(String),

    #[error("Branch name cannot start with '-': {0}")]
    StartsWithHyphen(String),

    #[error("Branch name contains consecutive dots: {0}")]
    ConsecutiveDots(String),

    #[error("Reserved branch name: {0}")]
    Reserved(String),
}

/// ブランチ名の値オブジェクト
///
/// gitとMercurialの両方で使える名前のみを受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchName {
    /// 検証済みブランチ名
    name: String,
}

fn issue_key_regex() -> &'static Regex {
    static ISSUE_KEY: OnceLock<Regex> = OnceLock::new();
    ISSUE_KEY.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*-[0-9]+$").expect("valid regex"))
}

impl BranchName {
    /// 新しいBranchNameインスタンスを作成
    pub fn new(name: &str) -> Result<Self, BranchNameError> {
        Self::validate(name)?;
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// ブランチ名の妥当性を検証
    fn validate(name: &str) -> Result<(), BranchNameError> {
        if name.is_empty() {
            return Err(BranchNameError::Empty);
        }

        if name.len() > 255 {
            return Err(BranchNameError::TooLong(name.len()));
        }

        if name.starts_with('-') {
            return Err(BranchNameError::StartsWithHyphen(name.to_string()));
        }

        // hgの予約語とgitの特殊参照
        if matches!(
            name,
            "HEAD" | "ORIG_HEAD" | "FETCH_HEAD" | "MERGE_HEAD" | "tip" | "." | "null"
        ) {
            return Err(BranchNameError::Reserved(name.to_string()));
        }

        // ASCII制御文字、空白、~、^、:、?、*、[、\
        for ch in name.chars() {
            if ch.is_ascii_control()
                || ch.is_whitespace()
                || matches!(ch, '~' | '^' | ':' | '?' | '*' | '[' | '\\')
            {
                return Err(BranchNameError::InvalidCharacter(ch.to_string()));
            }
        }

        if name.contains("..") {
            return Err(BranchNameError::ConsecutiveDots(name.to_string()));
        }

        Ok(())
    }

    /// ブランチ名を文字列として取得
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// ブランチ名がJiraの課題キー（例: `PROJ-123`）を兼ねている場合はそれを返す
    pub fn issue_key(&self) -> Option<String> {
        issue_key_regex()
            .is_match(&self.name)
            .then(|| self.name.to_uppercase())
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl std::str::FromStr for BranchName {
    type Err = BranchNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
