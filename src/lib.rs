//! # ju - run version-control commands across several repositories
//!
//! `ju` runs one command in every repository listed in its config file, one
//! repository after another. A failure in one repository is reported and the
//! run moves on to the next. Branches named after Jira issues drive the issue
//! workflow: `branch PROJ-123` assigns the issue and starts progress, `done`
//! commits, pushes and moves it to review.
//!
//! ## Quick Start
//!
//! 1. Create `~/.jurc`:
//!
//! ```ini
//! [aliases]
//! ci = commit
//!
//! [jira]
//! server = https://jira.example.com
//! username = me
//! password = secret
//!
//! [repository:api]
//! path = ~/work/api
//! remote = ssh://hg@example.com/api
//!
//! [repository:web]
//! path = ~/work/web
//! scm = git
//! ```
//!
//! 2. Run a command; any unique prefix or alias works:
//!
//! ```bash
//! ju st
//! ju branch PROJ-123
//! ju ci -m "Fix login"
//! ju done
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: repositories, configuration, branch names and SCM kinds
//! - [`application`]: command resolution, the per-repository fan-out and the commands
//! - [`infrastructure`]: git/hg working copies, the Jira client and the config file
//! - [`presentation`]: CLI parsing, terminal output and prompts
//! - [`common`]: the crate-wide error type and helpers
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ju::application::services::fan_out::{FanOutExecutor, SilentReporter};
//! use ju::application::use_cases::status::StatusUseCase;
//! use ju::application::use_cases::CommandContext;
//! use ju::infrastructure::filesystem::ConfigStore;
//! use ju::infrastructure::scm::ScmFactory;
//! use ju::presentation::ui::TerminalUi;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = ConfigStore::new();
//! let config = store.load(store.default_config_path()).await?;
//!
//! let ui = Arc::new(TerminalUi::new(false));
//! let context = Arc::new(CommandContext::new(Arc::new(ScmFactory), ui));
//! let status = StatusUseCase::new(context);
//!
//! FanOutExecutor::new(Arc::new(SilentReporter))
//!     .run_for_all(&status, &config)
//!     .await;
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::JuError;
pub use crate::common::result::JuResult as Result;
