//! 統合テスト用のヘルパー

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 一時ディレクトリ上の設定ファイルとリポジトリ
pub struct TestWorkspace {
    pub dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 設定ファイルを書き込み、そのパスを返す
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.path().join("jurc");
        std::fs::write(&path, content).expect("write config");
        path
    }

    /// 未追跡ファイルを1つ持つgitリポジトリを作成
    pub fn git_repository(&self, name: &str) -> PathBuf {
        let path = self.path().join(name);
        git2::Repository::init(&path).expect("init repository");
        std::fs::write(path.join("notes.txt"), "todo\n").expect("write file");
        path
    }

    /// 存在しないリポジトリのパス
    pub fn missing_repository(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }
}

/// 環境変数の影響を受けない`ju`コマンド
pub fn ju() -> Command {
    let mut command = Command::cargo_bin("ju").expect("ju binary");
    command
        .env_remove("JU_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    command
}

/// `[repository:<name>]`セクション
pub fn repository_section(name: &str, path: &Path) -> String {
    format!("[repository:{}]\npath = {}\nscm = git\n\n", name, path.display())
}
