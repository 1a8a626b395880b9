use std::path::PathBuf;
use thiserror::Error;

use crate::application::services::command_resolver::ResolveError;

#[derive(Error, Debug)]
pub enum JuError {
    #[error("Config file \"{}\" doesn't exist", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigParse {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Resolution(#[from] ResolveError),

    #[error("Invalid arguments for '{command}': {message}")]
    Usage { command: String, message: String },

    #[error("Prompt failed: {message}")]
    PromptError { message: String },

    #[error("Aborted")]
    Aborted,

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Operation timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl JuError {
    pub fn config_missing(path: impl Into<PathBuf>) -> Self {
        Self::ConfigMissing { path: path.into() }
    }

    pub fn config_parse_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigParse {
            message: message.into(),
            path,
            source: Some(Box::new(source)),
        }
    }

    pub fn usage(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Usage {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn prompt_error(message: impl Into<String>) -> Self {
        Self::PromptError {
            message: message.into(),
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Process exit code for errors that end the invocation.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Resolution(_) | Self::Usage { .. } => 2,
            _ => 1,
        }
    }
}

impl JuError {
    /// Convert a config loading failure, naming the file for parse errors.
    pub fn from_config_store(
        error: crate::infrastructure::filesystem::ConfigStoreError,
        path: &std::path::Path,
    ) -> Self {
        use crate::infrastructure::filesystem::ConfigStoreError;

        match error {
            ConfigStoreError::ConfigFileNotFound(missing) => Self::config_missing(missing),
            other => Self::config_parse_with_source(
                format!("{}: {}", path.display(), other),
                Some(path.to_path_buf()),
                other,
            ),
        }
    }
}

impl From<std::io::Error> for JuError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}
