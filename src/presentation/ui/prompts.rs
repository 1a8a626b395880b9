//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use crate::common::error::JuError;
use crate::common::result::JuResult;

fn map_dialoguer_err(e: dialoguer::Error) -> JuError {
    JuError::prompt_error(e.to_string())
}

/// Theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style(String::new()),
        ..ColorfulTheme::default()
    }
}

/// Ask a yes/no question.
///
/// Without a terminal the default answer is used.
pub fn confirm(question: &str, default: bool, term: &Term) -> JuResult<bool> {
    if !term.is_term() {
        return Ok(default);
    }

    Confirm::with_theme(&prompt_theme())
        .with_prompt(question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)
}

/// Ask for a line of text.
pub fn input(question: &str, term: &Term) -> JuResult<String> {
    if !term.is_term() {
        return Err(JuError::prompt_error(format!(
            "'{}' needs an interactive terminal",
            question
        )));
    }

    Input::<String>::with_theme(&prompt_theme())
        .with_prompt(question)
        .interact_text_on(term)
        .map_err(map_dialoguer_err)
}
