use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Operations the commands need from an issue tracker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch a single issue
    async fn issue(&self, key: &str) -> Result<Issue, IssueTrackerError>;

    /// Assign an issue to the given user
    async fn assign_issue(&self, key: &str, username: &str) -> Result<(), IssueTrackerError>;

    /// Transitions currently available for an issue
    async fn transitions(&self, key: &str) -> Result<Vec<Transition>, IssueTrackerError>;

    /// Apply a transition to an issue
    async fn transition_issue(&self, key: &str, transition_id: &str)
        -> Result<(), IssueTrackerError>;
}

/// The parts of an issue the commands look at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub summary: Option<String>,
    /// Username of the assignee, None when unassigned
    pub assignee: Option<String>,
    pub status: Option<String>,
}

impl Issue {
    /// Whether the issue is assigned to `username` (case-insensitive)
    pub fn is_assigned_to(&self, username: &str) -> bool {
        self.assignee
            .as_deref()
            .map(|assignee| assignee.eq_ignore_ascii_case(username))
            .unwrap_or(false)
    }
}

/// A workflow transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

/// Errors returned by issue tracker clients
#[derive(Debug, thiserror::Error)]
pub enum IssueTrackerError {
    #[error("Invalid issue tracker URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("Issue tracker request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Issue tracker returned {status} for {endpoint}: {message}")]
    Api {
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("Issue {0} does not exist")]
    IssueNotFound(String),
}
