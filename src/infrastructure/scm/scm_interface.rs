use crate::domain::value_objects::scm_type::ScmType;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Common interface for the version control operations the commands need
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScmOperations: Send + Sync {
    /// Get the SCM type this implementation handles
    fn scm_type(&self) -> ScmType;

    /// Check if a directory is a valid working copy for this SCM
    fn is_repository(&self, path: &Path) -> bool;

    /// Check that the SCM executable can be run
    async fn check_availability(&self) -> Result<(), ScmError>;

    /// Name of the branch the working copy is on
    async fn current_branch(&self, repo_path: &Path) -> Result<String, ScmError>;

    /// Whether a local branch with this name exists
    async fn branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool, ScmError>;

    /// Mark the working copy as being on a new branch
    async fn create_branch(&self, repo_path: &Path, branch: &str) -> Result<(), ScmError>;

    /// Changed, added, removed and untracked files of the working copy
    async fn status(&self, repo_path: &Path) -> Result<Vec<FileChange>, ScmError>;

    /// Diff of the working copy against its parent revision
    async fn diff(&self, repo_path: &Path) -> Result<String, ScmError>;

    /// Whether the default remote has changesets not present locally
    async fn incoming(&self, repo_path: &Path) -> Result<bool, ScmError>;

    /// Location of the default remote, if one is configured
    async fn default_remote(&self, repo_path: &Path) -> Result<Option<String>, ScmError>;

    /// Pull changes from the default remote
    async fn pull(&self, repo_path: &Path) -> Result<(), ScmError>;

    /// Update the working copy to a branch or revision.
    ///
    /// Returns file statistics when the SCM reports them.
    async fn update(
        &self,
        repo_path: &Path,
        revision: &str,
        clean: bool,
    ) -> Result<Option<UpdateStats>, ScmError>;

    /// Commit outstanding changes
    async fn commit(&self, repo_path: &Path, options: &CommitOptions) -> Result<(), ScmError>;

    /// Push changes to the given destination
    async fn push(&self, repo_path: &Path, options: &PushOptions) -> Result<PushOutcome, ScmError>;

    /// Clone a repository from the given URL to the specified path
    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError>;
}

/// Kind of change reported for a single file, using Mercurial's status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// `M`
    Modified,
    /// `A`
    Added,
    /// `R`
    Removed,
    /// `C`
    Clean,
    /// `!` - deleted by a non-SCM command but still tracked
    Missing,
    /// `?`
    Untracked,
    /// `I`
    Ignored,
}

impl ChangeKind {
    /// Single-character status code
    pub fn code(&self) -> char {
        match self {
            ChangeKind::Modified => 'M',
            ChangeKind::Added => 'A',
            ChangeKind::Removed => 'R',
            ChangeKind::Clean => 'C',
            ChangeKind::Missing => '!',
            ChangeKind::Untracked => '?',
            ChangeKind::Ignored => 'I',
        }
    }

    /// Parse a status code
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'M' => Some(ChangeKind::Modified),
            'A' => Some(ChangeKind::Added),
            'R' => Some(ChangeKind::Removed),
            'C' => Some(ChangeKind::Clean),
            '!' => Some(ChangeKind::Missing),
            '?' => Some(ChangeKind::Untracked),
            'I' => Some(ChangeKind::Ignored),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A file reported by `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub kind: ChangeKind,
    pub path: String,
}

impl FileChange {
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// File statistics reported after an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub updated: usize,
    pub merged: usize,
    pub removed: usize,
    pub unresolved: usize,
}

impl fmt::Display for UpdateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files updated, {} files merged, {} files removed, {} files unresolved",
            self.updated, self.merged, self.removed, self.unresolved
        )
    }
}

/// Options for committing
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Commit message
    pub message: String,
    /// Add untracked and remove missing files before committing
    pub addremove: bool,
    /// Mark the branch head as closed (Mercurial only)
    pub close_branch: bool,
}

impl CommitOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_addremove(mut self, addremove: bool) -> Self {
        self.addremove = addremove;
        self
    }

    pub fn with_close_branch(mut self, close_branch: bool) -> Self {
        self.close_branch = close_branch;
        self
    }
}

/// Options for pushing
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Destination URL (default remote when None)
    pub dest: Option<String>,
    /// Branch to push (current branch when None)
    pub branch: Option<String>,
    /// Allow creating a new remote branch
    pub new_branch: bool,
}

/// Result of a push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    NothingToPush,
}

/// Errors that can occur during SCM operations
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("Repository not found at path: {path}")]
    RepositoryNotFound { path: String },

    #[error("Clone operation failed: {message}")]
    CloneFailed { message: String },

    #[error("Status check failed: {message}")]
    StatusFailed { message: String },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("SCM executable not found: {executable}")]
    ExecutableNotFound { executable: String },

    #[error("Unsupported operation for {scm_type}: {operation}")]
    UnsupportedOperation { scm_type: ScmType, operation: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Git library error: {source}")]
    LibraryError {
        #[from]
        source: git2::Error,
    },

    #[error("Command execution failed: {command}, exit code: {exit_code}, stderr: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScmError {
    /// Create a repository not found error
    pub fn repository_not_found(path: &Path) -> Self {
        Self::RepositoryNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create a clone failed error
    pub fn clone_failed(message: impl Into<String>) -> Self {
        Self::CloneFailed {
            message: message.into(),
        }
    }

    /// Create a status failed error
    pub fn status_failed(message: impl Into<String>) -> Self {
        Self::StatusFailed {
            message: message.into(),
        }
    }

    /// Create a push failed error
    pub fn push_failed(message: impl Into<String>) -> Self {
        Self::PushFailed {
            message: message.into(),
        }
    }

    /// Create an executable not found error
    pub fn executable_not_found(executable: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            executable: executable.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported_operation(scm_type: ScmType, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            scm_type,
            operation: operation.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }
}
