/// Issue tracker infrastructure
///
/// A small trait over the operations the commands perform on issues, and a
/// Jira REST implementation of it.
pub mod jira_client;
pub mod tracker_interface;

pub use jira_client::JiraClient;
pub use tracker_interface::{Issue, IssueTracker, IssueTrackerError, Transition};

#[cfg(test)]
pub use tracker_interface::MockIssueTracker;
