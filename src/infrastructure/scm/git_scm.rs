use super::scm_interface::{
    ChangeKind, CommitOptions, FileChange, PushOptions, PushOutcome, ScmError, ScmOperations,
    UpdateStats,
};
use crate::domain::value_objects::scm_type::ScmType;
use async_trait::async_trait;
use git2::{BranchType, DiffFormat, ErrorCode, Repository, Status, StatusOptions};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Git implementation of SCM operations.
///
/// Local queries (branch, status, diff) read the repository through libgit2;
/// anything that touches the working tree or a remote runs the git executable.
pub struct GitScm {
    git_executable: String,
}

impl Default for GitScm {
    fn default() -> Self {
        Self {
            git_executable: ScmType::Git.executable_name().to_string(),
        }
    }
}

impl GitScm {
    /// Create a new Git SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
        }
    }

    fn open(&self, repo_path: &Path) -> Result<Repository, ScmError> {
        Repository::open(repo_path).map_err(|e| match e.code() {
            ErrorCode::NotFound => ScmError::repository_not_found(repo_path),
            _ => ScmError::from(e),
        })
    }

    /// Execute a git command in the given directory
    async fn execute_git_command(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<std::process::Output, ScmError> {
        debug!("Running {} {}", self.git_executable, args.join(" "));
        let mut cmd = Command::new(&self.git_executable);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await?;
        Ok(output)
    }

    /// Execute a git command and check for success
    async fn execute_git_command_checked(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, ScmError> {
        let output = self.execute_git_command(args, working_dir).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let command = format!("{} {}", self.git_executable, args.join(" "));
            return Err(ScmError::command_failed(
                command,
                output.status.code().unwrap_or(-1),
                stderr.trim(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Map a libgit2 status entry onto Mercurial-style change kinds
fn change_kind(status: Status) -> Option<ChangeKind> {
    if status.is_ignored() {
        Some(ChangeKind::Ignored)
    } else if status.is_wt_new() && !status.is_index_new() {
        Some(ChangeKind::Untracked)
    } else if status.is_index_new() {
        Some(ChangeKind::Added)
    } else if status.is_index_deleted() {
        Some(ChangeKind::Removed)
    } else if status.is_wt_deleted() {
        Some(ChangeKind::Missing)
    } else if status.intersects(
        Status::INDEX_MODIFIED
            | Status::WT_MODIFIED
            | Status::INDEX_RENAMED
            | Status::WT_RENAMED
            | Status::INDEX_TYPECHANGE
            | Status::WT_TYPECHANGE
            | Status::CONFLICTED,
    ) {
        Some(ChangeKind::Modified)
    } else {
        None
    }
}

#[async_trait]
impl ScmOperations for GitScm {
    fn scm_type(&self) -> ScmType {
        ScmType::Git
    }

    fn is_repository(&self, path: &Path) -> bool {
        Repository::open(path).is_ok()
    }

    async fn check_availability(&self) -> Result<(), ScmError> {
        let output = self
            .execute_git_command(&["--version"], None)
            .await
            .map_err(|_| ScmError::executable_not_found(&self.git_executable))?;

        if !output.status.success() {
            return Err(ScmError::executable_not_found(&self.git_executable));
        }

        Ok(())
    }

    async fn current_branch(&self, repo_path: &Path) -> Result<String, ScmError> {
        let repo = self.open(repo_path)?;

        let branch = match repo.head() {
            Ok(head) => head.shorthand().map(str::to_string),
            // Fresh repository without commits: HEAD still names the branch
            Err(e) if e.code() == ErrorCode::UnbornBranch => repo
                .find_reference("HEAD")?
                .symbolic_target()
                .map(|target| target.trim_start_matches("refs/heads/").to_string()),
            Err(e) => return Err(e.into()),
        };

        branch.ok_or_else(|| ScmError::status_failed("HEAD does not point to a branch"))
    }

    async fn branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool, ScmError> {
        let repo = self.open(repo_path)?;
        let exists = match repo.find_branch(branch, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        };
        exists
    }

    async fn create_branch(&self, repo_path: &Path, branch: &str) -> Result<(), ScmError> {
        self.execute_git_command_checked(&["checkout", "-b", branch], Some(repo_path))
            .await?;
        Ok(())
    }

    async fn status(&self, repo_path: &Path) -> Result<Vec<FileChange>, ScmError> {
        let repo = self.open(repo_path)?;

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = repo
            .statuses(Some(&mut options))
            .map_err(|e| ScmError::status_failed(e.to_string()))?;

        let changes = statuses
            .iter()
            .filter_map(|entry| {
                let kind = change_kind(entry.status())?;
                let path = entry.path()?.to_string();
                Some(FileChange::new(kind, path))
            })
            .collect();

        Ok(changes)
    }

    async fn diff(&self, repo_path: &Path) -> Result<String, ScmError> {
        let repo = self.open(repo_path)?;
        let head_tree = repo.head().ok().and_then(|head| head.peel_to_tree().ok());
        let diff = repo.diff_tree_to_workdir_with_index(head_tree.as_ref(), None)?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            if matches!(line.origin(), '+' | '-' | ' ') {
                text.push(line.origin());
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;

        Ok(text)
    }

    async fn incoming(&self, repo_path: &Path) -> Result<bool, ScmError> {
        if self.default_remote(repo_path).await?.is_none() {
            return Ok(false);
        }

        self.execute_git_command_checked(&["fetch", "--quiet"], Some(repo_path))
            .await?;

        // No upstream configured means nothing can come in
        let output = self
            .execute_git_command(&["rev-list", "--count", "HEAD..@{upstream}"], Some(repo_path))
            .await?;
        if !output.status.success() {
            return Ok(false);
        }

        let count: usize = String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .unwrap_or(0);
        Ok(count > 0)
    }

    async fn default_remote(&self, repo_path: &Path) -> Result<Option<String>, ScmError> {
        let repo = self.open(repo_path)?;
        let remote = match repo.find_remote("origin") {
            Ok(remote) => remote,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(remote.url().map(str::to_string))
    }

    async fn pull(&self, repo_path: &Path) -> Result<(), ScmError> {
        self.execute_git_command_checked(&["pull", "--ff-only"], Some(repo_path))
            .await?;
        Ok(())
    }

    async fn update(
        &self,
        repo_path: &Path,
        revision: &str,
        clean: bool,
    ) -> Result<Option<UpdateStats>, ScmError> {
        let mut args = vec!["checkout"];
        if clean {
            args.push("--force");
        }
        args.push(revision);

        self.execute_git_command_checked(&args, Some(repo_path))
            .await?;
        Ok(None)
    }

    async fn commit(&self, repo_path: &Path, options: &CommitOptions) -> Result<(), ScmError> {
        if options.close_branch {
            return Err(ScmError::unsupported_operation(
                ScmType::Git,
                "closing a branch",
            ));
        }

        if options.addremove {
            self.execute_git_command_checked(&["add", "--all"], Some(repo_path))
                .await?;
        }

        self.execute_git_command_checked(
            &["commit", "--all", "--message", &options.message],
            Some(repo_path),
        )
        .await?;
        Ok(())
    }

    async fn push(&self, repo_path: &Path, options: &PushOptions) -> Result<PushOutcome, ScmError> {
        let dest = options.dest.as_deref().unwrap_or("origin");
        let branch = options.branch.as_deref().unwrap_or("HEAD");

        let mut args = vec!["push", "--porcelain"];
        if options.new_branch {
            args.push("--set-upstream");
        }
        args.push(dest);
        args.push(branch);

        let output = self.execute_git_command(&args, Some(repo_path)).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(ScmError::push_failed(stderr.trim().to_string()));
        }

        // Porcelain output flags each ref; '=' means the ref was already up to date
        let pushed = stdout
            .lines()
            .any(|line| line.starts_with(&['*', '+', ' ', '-'][..]) && line.contains(':'));
        if pushed {
            Ok(PushOutcome::Pushed)
        } else {
            Ok(PushOutcome::NothingToPush)
        }
    }

    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError> {
        let dest = dest_path.to_str().ok_or_else(|| ScmError::Internal {
            message: "Invalid destination path".to_string(),
        })?;

        let output = self.execute_git_command(&["clone", url, dest], None).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScmError::clone_failed(format!(
                "Git clone failed: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_change_kind_mapping() {
        assert_eq!(change_kind(Status::WT_NEW), Some(ChangeKind::Untracked));
        assert_eq!(change_kind(Status::INDEX_NEW), Some(ChangeKind::Added));
        assert_eq!(change_kind(Status::INDEX_DELETED), Some(ChangeKind::Removed));
        assert_eq!(change_kind(Status::WT_DELETED), Some(ChangeKind::Missing));
        assert_eq!(change_kind(Status::WT_MODIFIED), Some(ChangeKind::Modified));
        assert_eq!(
            change_kind(Status::INDEX_MODIFIED | Status::WT_MODIFIED),
            Some(ChangeKind::Modified)
        );
        assert_eq!(change_kind(Status::IGNORED), Some(ChangeKind::Ignored));
        assert_eq!(change_kind(Status::CURRENT), None);
    }

    #[test]
    fn test_is_repository() {
        let temp_dir = TempDir::new().unwrap();
        let scm = GitScm::new();
        assert!(!scm.is_repository(temp_dir.path()));

        Repository::init(temp_dir.path()).unwrap();
        assert!(scm.is_repository(temp_dir.path()));
    }

    #[tokio::test]
    async fn test_status_reports_untracked_files() {
        let temp_dir = TempDir::new().unwrap();
        Repository::init(temp_dir.path()).unwrap();
        std::fs::write(temp_dir.path().join("new.txt"), "hello\n").unwrap();

        let changes = GitScm::new().status(temp_dir.path()).await.unwrap();
        assert_eq!(
            changes,
            vec![FileChange::new(ChangeKind::Untracked, "new.txt")]
        );
    }

    #[tokio::test]
    async fn test_current_branch_on_unborn_head() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        repo.set_head("refs/heads/trunk").unwrap();

        let branch = GitScm::new().current_branch(temp_dir.path()).await.unwrap();
        assert_eq!(branch, "trunk");
    }

    #[tokio::test]
    async fn test_default_remote() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        let scm = GitScm::new();
        assert_eq!(scm.default_remote(temp_dir.path()).await.unwrap(), None);

        repo.remote("origin", "https://example.com/repo.git").unwrap();
        assert_eq!(
            scm.default_remote(temp_dir.path()).await.unwrap(),
            Some("https://example.com/repo.git".to_string())
        );
    }

    #[tokio::test]
    async fn test_branch_exists_without_commits() {
        let temp_dir = TempDir::new().unwrap();
        Repository::init(temp_dir.path()).unwrap();

        let exists = GitScm::new()
            .branch_exists(temp_dir.path(), "feature")
            .await
            .unwrap();
        assert!(!exists);
    }

    #[tokio::test]
    async fn test_branch_exists_after_commit() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        let signature = git2::Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let commit_id = repo
            .commit(Some("HEAD"), &signature, &signature, "init", &tree, &[])
            .unwrap();
        let commit = repo.find_commit(commit_id).unwrap();
        repo.branch("PROJ-7", &commit, false).unwrap();

        let scm = GitScm::new();
        assert!(scm.branch_exists(temp_dir.path(), "PROJ-7").await.unwrap());
        assert!(!scm.branch_exists(temp_dir.path(), "PROJ-8").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let scm = GitScm::with_executable("/nonexistent/git-binary");
        assert!(matches!(
            scm.check_availability().await,
            Err(ScmError::ExecutableNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_repository() {
        let temp_dir = TempDir::new().unwrap();
        let result = GitScm::new().status(&temp_dir.path().join("nope")).await;
        assert!(matches!(result, Err(ScmError::RepositoryNotFound { .. })));
    }

    #[tokio::test]
    async fn test_close_branch_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let options = CommitOptions::new("msg").with_close_branch(true);
        let result = GitScm::new().commit(temp_dir.path(), &options).await;
        assert!(matches!(result, Err(ScmError::UnsupportedOperation { .. })));
    }
}
