use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::value_objects::scm_type::ScmType;

/// 設定ファイルに記述された作業コピー（リポジトリ記述子）
///
/// 設定読み込み時に生成され、プロセス終了まで変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// 表示用の名前（`[repository:<name>]`の`<name>`）
    pub name: String,

    /// 作業コピーのパス
    pub path: PathBuf,

    /// push/clone先のURL
    pub remote: Option<String>,

    /// 既定ブランチ（未指定の場合はSCMの慣習に従う）
    pub default_branch: Option<String>,

    /// SCMの種類（未指定の場合は作業コピーから検出）
    pub scm: Option<ScmType>,
}

impl Repository {
    /// 新しいRepositoryインスタンスを作成
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            remote: None,
            default_branch: None,
            scm: None,
        }
    }

    /// リモートURLを設定
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    /// 既定ブランチを設定
    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    /// SCMの種類を設定
    pub fn with_scm(mut self, scm: ScmType) -> Self {
        self.scm = Some(scm);
        self
    }

    /// このリポジトリのSCM種別を決定する
    ///
    /// 明示指定 > 作業コピーのメタデータ > リモートURL > Mercurial の順。
    pub fn scm_type(&self) -> ScmType {
        self.scm
            .or_else(|| ScmType::detect(&self.path))
            .or_else(|| self.remote.as_deref().and_then(ScmType::from_remote))
            .unwrap_or_default()
    }

    /// 既定ブランチ名を取得
    pub fn default_branch(&self) -> String {
        self.default_branch
            .clone()
            .unwrap_or_else(|| self.scm_type().default_branch().to_string())
    }
}
