use super::scm_interface::{
    ChangeKind, CommitOptions, FileChange, PushOptions, PushOutcome, ScmError, ScmOperations,
    UpdateStats,
};
use crate::domain::value_objects::scm_type::ScmType;
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::debug;

/// Mercurial implementation of SCM operations
pub struct HgScm {
    hg_executable: String,
}

impl Default for HgScm {
    fn default() -> Self {
        Self {
            hg_executable: ScmType::Hg.executable_name().to_string(),
        }
    }
}

impl HgScm {
    /// Create a new Mercurial SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            hg_executable: executable.into(),
        }
    }

    /// Execute an hg command in the given directory
    async fn execute_hg_command(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<std::process::Output, ScmError> {
        debug!("Running {} {}", self.hg_executable, args.join(" "));
        let mut cmd = Command::new(&self.hg_executable);
        cmd.args(args)
            // Keep output parseable regardless of user configuration
            .env("HGPLAIN", "1")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await?;
        Ok(output)
    }

    /// Execute an hg command and check for success
    async fn execute_hg_command_checked(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, ScmError> {
        let output = self.execute_hg_command(args, working_dir).await?;

        if !output.status.success() {
            return Err(self.command_failed(args, &output));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }

    fn command_failed(&self, args: &[&str], output: &std::process::Output) -> ScmError {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let command = format!("{} {}", self.hg_executable, args.join(" "));
        ScmError::command_failed(command, output.status.code().unwrap_or(-1), stderr.trim())
    }

    fn ensure_repository(&self, repo_path: &Path) -> Result<(), ScmError> {
        if self.is_repository(repo_path) {
            Ok(())
        } else {
            Err(ScmError::repository_not_found(repo_path))
        }
    }
}

/// Parse `hg status` output ("M path/to/file" per line)
pub(crate) fn parse_status(output: &str) -> Vec<FileChange> {
    output
        .lines()
        .filter_map(|line| {
            let mut chars = line.chars();
            let kind = ChangeKind::from_code(chars.next()?)?;
            let path = line.get(2..)?.to_string();
            Some(FileChange::new(kind, path))
        })
        .collect()
}

fn update_stats_regex() -> &'static Regex {
    static UPDATE_STATS: OnceLock<Regex> = OnceLock::new();
    UPDATE_STATS.get_or_init(|| {
        Regex::new(
            r"(\d+) files updated, (\d+) files merged, (\d+) files removed, (\d+) files unresolved",
        )
        .expect("valid regex")
    })
}

/// Parse the summary line printed by `hg update`
pub(crate) fn parse_update_stats(output: &str) -> Option<UpdateStats> {
    let captures = update_stats_regex().captures(output)?;
    let field = |i: usize| -> usize {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    Some(UpdateStats {
        updated: field(1),
        merged: field(2),
        removed: field(3),
        unresolved: field(4),
    })
}

#[async_trait]
impl ScmOperations for HgScm {
    fn scm_type(&self) -> ScmType {
        ScmType::Hg
    }

    fn is_repository(&self, path: &Path) -> bool {
        path.join(".hg").is_dir()
    }

    async fn check_availability(&self) -> Result<(), ScmError> {
        let output = self
            .execute_hg_command(&["--version"], None)
            .await
            .map_err(|_| ScmError::executable_not_found(&self.hg_executable))?;

        if !output.status.success() {
            return Err(ScmError::executable_not_found(&self.hg_executable));
        }

        Ok(())
    }

    async fn current_branch(&self, repo_path: &Path) -> Result<String, ScmError> {
        self.ensure_repository(repo_path)?;
        let branch = self
            .execute_hg_command_checked(&["branch"], Some(repo_path))
            .await?;
        Ok(branch.trim().to_string())
    }

    async fn branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool, ScmError> {
        self.ensure_repository(repo_path)?;
        let output = self
            .execute_hg_command_checked(&["branches", "--closed", "--quiet"], Some(repo_path))
            .await?;
        Ok(output.lines().any(|line| line.trim() == branch))
    }

    async fn create_branch(&self, repo_path: &Path, branch: &str) -> Result<(), ScmError> {
        self.ensure_repository(repo_path)?;
        self.execute_hg_command_checked(&["branch", branch], Some(repo_path))
            .await?;
        Ok(())
    }

    async fn status(&self, repo_path: &Path) -> Result<Vec<FileChange>, ScmError> {
        self.ensure_repository(repo_path)?;
        let output = self
            .execute_hg_command_checked(&["status"], Some(repo_path))
            .await
            .map_err(|e| ScmError::status_failed(e.to_string()))?;
        Ok(parse_status(&output))
    }

    async fn diff(&self, repo_path: &Path) -> Result<String, ScmError> {
        self.ensure_repository(repo_path)?;
        self.execute_hg_command_checked(&["diff"], Some(repo_path))
            .await
    }

    async fn incoming(&self, repo_path: &Path) -> Result<bool, ScmError> {
        self.ensure_repository(repo_path)?;
        let args = ["incoming", "--quiet"];
        let output = self.execute_hg_command(&args, Some(repo_path)).await?;

        // hg incoming exits with 1 when there is nothing to pull
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(self.command_failed(&args, &output)),
        }
    }

    async fn default_remote(&self, repo_path: &Path) -> Result<Option<String>, ScmError> {
        self.ensure_repository(repo_path)?;
        let output = self
            .execute_hg_command(&["paths", "default"], Some(repo_path))
            .await?;

        if !output.status.success() {
            return Ok(None);
        }

        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!path.is_empty()).then_some(path))
    }

    async fn pull(&self, repo_path: &Path) -> Result<(), ScmError> {
        self.ensure_repository(repo_path)?;
        self.execute_hg_command_checked(&["pull"], Some(repo_path))
            .await?;
        Ok(())
    }

    async fn update(
        &self,
        repo_path: &Path,
        revision: &str,
        clean: bool,
    ) -> Result<Option<UpdateStats>, ScmError> {
        self.ensure_repository(repo_path)?;
        let mut args = vec!["update"];
        if clean {
            args.push("--clean");
        }
        args.push(revision);

        let output = self
            .execute_hg_command_checked(&args, Some(repo_path))
            .await?;
        Ok(parse_update_stats(&output))
    }

    async fn commit(&self, repo_path: &Path, options: &CommitOptions) -> Result<(), ScmError> {
        self.ensure_repository(repo_path)?;
        let mut args = vec!["commit", "--message", options.message.as_str()];
        if options.addremove {
            args.push("--addremove");
        }
        if options.close_branch {
            args.push("--close-branch");
        }

        self.execute_hg_command_checked(&args, Some(repo_path))
            .await?;
        Ok(())
    }

    async fn push(&self, repo_path: &Path, options: &PushOptions) -> Result<PushOutcome, ScmError> {
        self.ensure_repository(repo_path)?;
        let mut args = vec!["push"];
        if let Some(branch) = &options.branch {
            args.push("--branch");
            args.push(branch);
        }
        if options.new_branch {
            args.push("--new-branch");
        }
        if let Some(dest) = &options.dest {
            args.push(dest);
        }

        let output = self.execute_hg_command(&args, Some(repo_path)).await?;

        // hg push exits with 1 when there are no outgoing changes
        match output.status.code() {
            Some(0) => Ok(PushOutcome::Pushed),
            Some(1) => Ok(PushOutcome::NothingToPush),
            _ => Err(ScmError::push_failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            )),
        }
    }

    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError> {
        let dest = dest_path.to_str().ok_or_else(|| ScmError::Internal {
            message: "Invalid destination path".to_string(),
        })?;

        let output = self.execute_hg_command(&["clone", url, dest], None).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScmError::clone_failed(format!(
                "Mercurial clone failed: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}
