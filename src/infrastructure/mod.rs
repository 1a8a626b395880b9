/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - SCM operations (git, Mercurial)
/// - Issue tracker access (Jira REST API)
/// - File system operations (config file)
pub mod filesystem;
pub mod issue_tracker;
pub mod scm;

// Re-export commonly used types
pub use filesystem::{ConfigStore, ConfigStoreError};
pub use issue_tracker::{IssueTracker, IssueTrackerError, JiraClient};
pub use scm::{ScmError, ScmFactory, ScmOperations, ScmProvider};
