//! Arguments of the individual commands.
//!
//! The top-level parser only sees the command token; everything after it is
//! parsed here once the token has been resolved.

pub mod branch;
pub mod clone;
pub mod commit;
pub mod config;
pub mod diff;
pub mod done;
pub mod push;
pub mod status;
pub mod update;

pub use branch::BranchArgs;
pub use clone::CloneArgs;
pub use commit::CommitArgs;
pub use config::ConfigArgs;
pub use diff::DiffArgs;
pub use done::DoneArgs;
pub use push::PushArgs;
pub use status::StatusArgs;
pub use update::UpdateArgs;

use clap::error::ErrorKind;
use clap::Parser;
use std::sync::Arc;

use crate::application::services::command_resolver::CommandKind;
use crate::application::services::fan_out::RepositoryHandler;
use crate::application::use_cases::CommandContext;
use crate::common::error::JuError;
use crate::common::result::JuResult;

/// A command that runs once per configured repository
pub trait RepositoryCommand: Parser {
    fn into_handler(self, context: Arc<CommandContext>) -> Box<dyn RepositoryHandler>;
}

/// Parse the arguments that followed the command token.
///
/// Returns `None` when clap already printed help or version output.
pub fn parse_args<T: Parser>(command: CommandKind, args: &[String]) -> JuResult<Option<T>> {
    let argv = std::iter::once(format!("ju {}", command.name())).chain(args.iter().cloned());

    match T::try_parse_from(argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            Ok(None)
        }
        Err(e) => Err(JuError::usage(
            command.name(),
            e.render().to_string().trim_end(),
        )),
    }
}
