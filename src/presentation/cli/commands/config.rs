use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::process::Command;
use tracing::debug;

use crate::application::use_cases::UserInterface;
use crate::common::result::ResultExt;
use crate::domain::entities::Configuration;

const FALLBACK_EDITOR: &str = "vi";

/// Show the config file, or open it in an editor
#[derive(Parser, Debug, Default)]
pub struct ConfigArgs {
    /// Open the file in $VISUAL or $EDITOR
    #[arg(short, long)]
    pub edit: bool,
}

impl ConfigArgs {
    pub async fn execute(&self, config: &Configuration, ui: &dyn UserInterface) -> Result<()> {
        let path = config.config_path();

        if !self.edit {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_filesystem_error("Failed to read config file", Some(path.to_path_buf()))?;
            ui.message(content.trim_end());
            return Ok(());
        }

        let editor = editor_command(std::env::var("VISUAL").ok(), std::env::var("EDITOR").ok());
        let (program, args) = editor
            .split_first()
            .context("No editor configured")?;
        debug!("Editing {} with {}", path.display(), program);

        let status = Command::new(program)
            .args(args)
            .arg(path)
            .status()
            .await
            .with_context(|| format!("Failed to start editor '{}'", program))?;

        if !status.success() {
            bail!("Editor '{}' exited with {}", program, status);
        }
        Ok(())
    }
}

/// `$VISUAL`, then `$EDITOR`, then `vi`, split into program and arguments
fn editor_command(visual: Option<String>, editor: Option<String>) -> Vec<String> {
    [visual, editor]
        .into_iter()
        .flatten()
        .map(|value| {
            value
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .find(|parts| !parts.is_empty())
        .unwrap_or_else(|| vec![FALLBACK_EDITOR.to_string()])
}
