//! Terminal output and prompts.

pub mod display;
pub mod prompts;
pub mod terminal;

pub use display::DisplayHelper;
pub use terminal::TerminalUi;
