pub mod configuration;
pub mod repository;

pub use configuration::{Configuration, IssueTrackerCredentials};
pub use repository::Repository;
