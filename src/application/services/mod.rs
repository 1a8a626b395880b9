pub mod command_resolver;
pub mod fan_out;
pub mod issue_workflow;

pub use command_resolver::{CommandKind, CommandRegistry, ResolveError};
pub use fan_out::{ExecutionReporter, FanOutExecutor, RepositoryHandler};
pub use issue_workflow::IssueWorkflow;
