use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod commands;

use crate::application::services::command_resolver::{CommandKind, CommandRegistry};
use crate::application::services::fan_out::{FanOutExecutor, RepositoryHandler};
use crate::application::services::issue_workflow::IssueWorkflow;
use crate::application::use_cases::CommandContext;
use crate::common::error::JuError;
use crate::domain::entities::Configuration;
use crate::infrastructure::filesystem::ConfigStore;
use crate::infrastructure::issue_tracker::JiraClient;
use crate::infrastructure::scm::ScmFactory;
use crate::presentation::ui::TerminalUi;
use commands::{
    parse_args, BranchArgs, CloneArgs, CommitArgs, ConfigArgs, DiffArgs, DoneArgs, PushArgs,
    RepositoryCommand, StatusArgs, UpdateArgs,
};

/// ju - run VCS and Jira commands across several repositories
#[derive(Parser, Debug)]
#[command(
    name = "ju",
    version,
    about = "Run VCS and Jira commands across several repositories",
    subcommand_value_name = "COMMAND",
    after_help = commands_help()
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Config file to read instead of ~/.jurc
    #[arg(long, env = "JU_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub invocation: Option<Invocation>,
}

/// The command token and its arguments, passed through untouched so the
/// token can be resolved against aliases and prefixes.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    #[command(external_subcommand)]
    Command(Vec<String>),
}

fn commands_help() -> String {
    let registry = CommandRegistry::builtin();
    let mut help = String::from("Commands (any unique prefix works):\n");
    for kind in registry.commands() {
        help.push_str(&format!("  {:<8} {}\n", kind.name(), kind.about()));
    }
    help
}

/// CLI application
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    /// Parse the process arguments
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn verbose(&self) -> bool {
        self.cli.verbose
    }

    /// Run the application and return the process exit code
    pub async fn run(&self) -> i32 {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        match self.execute().await {
            Ok(()) => 0,
            Err(error) => report_error(&error),
        }
    }

    async fn execute(&self) -> anyhow::Result<()> {
        let Some(Invocation::Command(argv)) = &self.cli.invocation else {
            Cli::command().print_help()?;
            return Ok(());
        };
        let Some((token, args)) = argv.split_first() else {
            Cli::command().print_help()?;
            return Ok(());
        };

        let config = self.load_config().await?;
        let kind = CommandRegistry::builtin()
            .resolve(token, &config.aliases)
            .map_err(JuError::from)?;
        debug!("Resolved '{}' to '{}'", token, kind);

        let ui = Arc::new(TerminalUi::new(!self.cli.no_color));
        let context = Arc::new(build_context(&config, ui.clone()));

        match kind {
            CommandKind::Config => {
                if let Some(command) = parse_args::<ConfigArgs>(kind, args)? {
                    command.execute(&config, ui.as_ref()).await?;
                }
            }
            CommandKind::Done => {
                let Some(command) = parse_args::<DoneArgs>(kind, args)? else {
                    return Ok(());
                };
                let use_case = command.into_use_case(context);
                if !use_case.confirm_start(&config)? {
                    return Err(JuError::Aborted.into());
                }
                run_for_all(&use_case, &config, ui).await;
            }
            CommandKind::Branch => run_command::<BranchArgs>(kind, args, context, &config, ui).await?,
            CommandKind::Clone => run_command::<CloneArgs>(kind, args, context, &config, ui).await?,
            CommandKind::Commit => run_command::<CommitArgs>(kind, args, context, &config, ui).await?,
            CommandKind::Diff => run_command::<DiffArgs>(kind, args, context, &config, ui).await?,
            CommandKind::Push => run_command::<PushArgs>(kind, args, context, &config, ui).await?,
            CommandKind::Status => run_command::<StatusArgs>(kind, args, context, &config, ui).await?,
            CommandKind::Update => run_command::<UpdateArgs>(kind, args, context, &config, ui).await?,
        }

        Ok(())
    }

    async fn load_config(&self) -> Result<Configuration, JuError> {
        let store = ConfigStore::new();
        let path = self
            .cli
            .config
            .clone()
            .unwrap_or_else(|| store.default_config_path());

        let config = store
            .load(&path)
            .await
            .map_err(|e| JuError::from_config_store(e, &path))?;
        Ok(config.with_verbose(self.cli.verbose))
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

fn build_context(config: &Configuration, ui: Arc<TerminalUi>) -> CommandContext {
    let context = CommandContext::new(Arc::new(ScmFactory), ui);

    let Some(credentials) = &config.issue_tracker else {
        return context;
    };
    match JiraClient::new(credentials) {
        Ok(client) => context.with_issue_workflow(IssueWorkflow::new(
            Arc::new(client),
            credentials.clone(),
        )),
        Err(e) => {
            warn!("Jira integration disabled: {}", e);
            context
        }
    }
}

async fn run_command<T: RepositoryCommand>(
    kind: CommandKind,
    args: &[String],
    context: Arc<CommandContext>,
    config: &Configuration,
    ui: Arc<TerminalUi>,
) -> Result<(), JuError> {
    if let Some(command) = parse_args::<T>(kind, args)? {
        let handler = command.into_handler(context);
        run_for_all(handler.as_ref(), config, ui).await;
    }
    Ok(())
}

async fn run_for_all(handler: &dyn RepositoryHandler, config: &Configuration, ui: Arc<TerminalUi>) {
    FanOutExecutor::new(ui).run_for_all(handler, config).await;
}

/// Print an invocation-level error and pick the exit code
fn report_error(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<JuError>() {
        Some(JuError::Usage { message, .. }) => {
            eprintln!("{}", message);
            2
        }
        Some(ju_error) => {
            eprintln!("{} {}", "Error:".red().bold(), ju_error);
            ju_error.exit_code()
        }
        None => {
            eprintln!("{} {:#}", "Error:".red().bold(), error);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_and_arguments_are_passed_through() {
        let cli = Cli::try_parse_from(["ju", "-v", "--config", "/tmp/jurc", "up", "-C", "default"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/jurc")));
        assert_eq!(
            cli.invocation,
            Some(Invocation::Command(vec![
                "up".to_string(),
                "-C".to_string(),
                "default".to_string()
            ]))
        );
    }

    #[test]
    fn test_command_help_goes_to_the_command() {
        let cli = Cli::try_parse_from(["ju", "st", "--help"]).unwrap();
        assert_eq!(
            cli.invocation,
            Some(Invocation::Command(vec!["st".to_string(), "--help".to_string()]))
        );
    }

    #[test]
    fn test_help_lists_commands() {
        let help = commands_help();
        assert!(help.contains("branch"));
        assert!(help.contains("update"));
    }

    #[test]
    fn test_exit_codes() {
        let resolution = anyhow::Error::new(JuError::from(
            crate::application::services::command_resolver::ResolveError::CommandNotFound(
                "x".to_string(),
            ),
        ));
        assert_eq!(report_error(&resolution), 2);
        assert_eq!(report_error(&anyhow::Error::new(JuError::Aborted)), 1);
        assert_eq!(report_error(&anyhow::anyhow!("other")), 1);
    }
}
