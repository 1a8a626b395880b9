use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tokio::fs as async_fs;
use tracing::{debug, warn};

use crate::domain::entities::configuration::{
    Configuration, IssueTrackerCredentials, DEFAULT_DONE_TRANSITION, DEFAULT_START_TRANSITION,
};
use crate::domain::entities::repository::Repository;
use crate::domain::value_objects::scm_type::{ScmType, ScmTypeError};

/// Default config file name, looked up in the home directory
pub const DEFAULT_CONFIG_FILE: &str = ".jurc";

const ALIASES_SECTION: &str = "aliases";
const JIRA_SECTION: &str = "jira";
const SETTINGS_SECTION: &str = "settings";
const REPOSITORY_PREFIX: &str = "repository:";

/// Config store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Config file \"{}\" doesn't exist", .0.display())]
    ConfigFileNotFound(PathBuf),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("[{section}] is missing required key '{key}'")]
    MissingKey { section: String, key: String },

    #[error("[{section}] has an invalid value for '{key}': {reason}")]
    InvalidValue {
        section: String,
        key: String,
        reason: String,
    },

    #[error("Invalid section [{section}]: {reason}")]
    InvalidSection { section: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn section_regex() -> &'static Regex {
    static SECTION: OnceLock<Regex> = OnceLock::new();
    SECTION.get_or_init(|| Regex::new(r"^\[(?P<name>[^\]]+)\]\s*$").expect("valid regex"))
}

fn option_regex() -> &'static Regex {
    static OPTION: OnceLock<Regex> = OnceLock::new();
    OPTION.get_or_init(|| {
        Regex::new(r"^(?P<key>[^=:\s][^=:]*?)\s*[=:]\s*(?P<value>.*?)\s*$").expect("valid regex")
    })
}

/// One `[section]` of an INI document, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Value of `key`; the last occurrence wins
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All key/value pairs in file order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn require(&self, key: &str) -> Result<&str, ConfigStoreError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigStoreError::MissingKey {
                section: self.name.clone(),
                key: key.to_string(),
            })
    }
}

/// Parsed INI document
///
/// Supports `key = value` and `key: value` pairs, `#`/`;` comment lines and
/// indented continuation lines. Keys are stored lowercase, section names
/// verbatim. A blank line ends a multi-line value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn parse(content: &str) -> Result<Self, ConfigStoreError> {
        let mut sections: Vec<IniSection> = Vec::new();
        // Index of the entry a continuation line would extend
        let mut open_entry: Option<usize> = None;

        for (index, raw_line) in content.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = raw_line.trim();

            if trimmed.is_empty() {
                open_entry = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = raw_line.starts_with(char::is_whitespace);
            if indented {
                if let (Some(entry), Some(section)) = (open_entry, sections.last_mut()) {
                    let value = &mut section.entries[entry].1;
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(trimmed);
                    continue;
                }
            }

            if let Some(captures) = section_regex().captures(trimmed) {
                sections.push(IniSection::new(captures["name"].trim()));
                open_entry = None;
                continue;
            }

            let Some(captures) = option_regex().captures(trimmed) else {
                return Err(ConfigStoreError::Syntax {
                    line: line_number,
                    message: format!("cannot parse '{}'", trimmed),
                });
            };

            let Some(section) = sections.last_mut() else {
                return Err(ConfigStoreError::Syntax {
                    line: line_number,
                    message: "key/value pair outside of any section".to_string(),
                });
            };

            section.entries.push((
                captures["key"].to_lowercase(),
                captures["value"].to_string(),
            ));
            open_entry = Some(section.entries.len() - 1);
        }

        Ok(Self { sections })
    }

    /// First section with exactly this name
    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// All sections in file order
    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }
}

/// Reads `~/.jurc`-style config files into a [`Configuration`]
#[derive(Debug, Clone)]
pub struct ConfigStore {
    home_dir: Option<PathBuf>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create a store that expands `~` to the current user's home directory
    pub fn new() -> Self {
        Self {
            home_dir: dirs::home_dir(),
        }
    }

    /// Create a store with an explicit home directory
    pub fn with_home_dir(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: Some(home_dir.into()),
        }
    }

    /// `~/.jurc`, or a relative `.jurc` when no home directory is known
    pub fn default_config_path(&self) -> PathBuf {
        match &self.home_dir {
            Some(home) => home.join(DEFAULT_CONFIG_FILE),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    /// Read and parse a config file
    pub async fn load<P: AsRef<Path>>(&self, path: P) -> Result<Configuration, ConfigStoreError> {
        let path = self.expand_home(&path.as_ref().to_string_lossy());

        if !path.is_file() {
            return Err(ConfigStoreError::ConfigFileNotFound(path));
        }

        debug!("Loading config from {}", path.display());
        let content = async_fs::read_to_string(&path).await?;
        self.parse(&content, &path)
    }

    /// Build a configuration from already-read file content
    pub fn parse(&self, content: &str, path: &Path) -> Result<Configuration, ConfigStoreError> {
        let document = IniDocument::parse(content)?;
        Self::check_single_sections(&document)?;
        let mut config = Configuration::new(path);

        config.aliases = self.read_aliases(&document);
        if let Some(credentials) = self.read_issue_tracker(&document) {
            config = config.with_issue_tracker(credentials);
        }
        config.timeout = self.read_timeout(&document)?;

        for section in document.sections() {
            if let Some(name) = section.name.strip_prefix(REPOSITORY_PREFIX) {
                config.repositories.push(self.read_repository(name, section)?);
            }
        }

        debug!(
            "Loaded {} repositories and {} aliases",
            config.repositories.len(),
            config.aliases.len()
        );

        Ok(config)
    }

    /// `[aliases]`, `[jira]` and `[settings]` may appear at most once
    fn check_single_sections(document: &IniDocument) -> Result<(), ConfigStoreError> {
        let mut seen = HashSet::new();
        for section in document.sections() {
            if section.name.starts_with(REPOSITORY_PREFIX) {
                continue;
            }
            if !seen.insert(section.name.as_str()) {
                return Err(ConfigStoreError::InvalidSection {
                    section: section.name.clone(),
                    reason: "section appears more than once".to_string(),
                });
            }
        }
        Ok(())
    }

    fn read_aliases(&self, document: &IniDocument) -> HashMap<String, String> {
        let Some(section) = document.section(ALIASES_SECTION) else {
            warn!("No [{}] section in config; aliases disabled", ALIASES_SECTION);
            return HashMap::new();
        };

        section
            .entries()
            .map(|(name, command)| (name.to_string(), command.trim().to_string()))
            .collect()
    }

    fn read_issue_tracker(&self, document: &IniDocument) -> Option<IssueTrackerCredentials> {
        let Some(section) = document.section(JIRA_SECTION) else {
            warn!("No [{}] section in config; Jira integration disabled", JIRA_SECTION);
            return None;
        };

        let credentials = Self::read_credentials(section);

        match credentials {
            Ok(credentials) => Some(
                credentials.with_transitions(
                    section
                        .get("start_transition")
                        .unwrap_or(DEFAULT_START_TRANSITION),
                    section
                        .get("done_transition")
                        .unwrap_or(DEFAULT_DONE_TRANSITION),
                ),
            ),
            Err(e) => {
                warn!("Ignoring incomplete Jira configuration: {}", e);
                None
            }
        }
    }

    fn read_credentials(section: &IniSection) -> Result<IssueTrackerCredentials, ConfigStoreError> {
        Ok(IssueTrackerCredentials::new(
            section.require("server")?,
            section.require("username")?,
            section.require("password")?,
        ))
    }

    fn read_timeout(&self, document: &IniDocument) -> Result<Option<Duration>, ConfigStoreError> {
        let Some(raw) = document
            .section(SETTINGS_SECTION)
            .and_then(|section| section.get("timeout"))
        else {
            return Ok(None);
        };

        match raw.trim().parse::<u64>() {
            Ok(0) => Err(ConfigStoreError::InvalidValue {
                section: SETTINGS_SECTION.to_string(),
                key: "timeout".to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            Ok(seconds) => Ok(Some(Duration::from_secs(seconds))),
            Err(e) => Err(ConfigStoreError::InvalidValue {
                section: SETTINGS_SECTION.to_string(),
                key: "timeout".to_string(),
                reason: format!("'{}' is not a number of seconds ({})", raw, e),
            }),
        }
    }

    fn read_repository(
        &self,
        name: &str,
        section: &IniSection,
    ) -> Result<Repository, ConfigStoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigStoreError::InvalidSection {
                section: section.name.clone(),
                reason: "repository name is empty".to_string(),
            });
        }

        let path = self.expand_home(section.require("path")?);
        let mut repository = Repository::new(name, path);

        if let Some(remote) = ["remote", "url", "http_basic"]
            .iter()
            .find_map(|key| section.get(key).filter(|value| !value.is_empty()))
        {
            repository = repository.with_remote(remote);
        }

        if let Some(branch) = section.get("default_branch").filter(|v| !v.is_empty()) {
            repository = repository.with_default_branch(branch);
        }

        if let Some(raw) = section.get("scm").filter(|v| !v.is_empty()) {
            let scm: ScmType = raw.parse().map_err(|e: ScmTypeError| {
                ConfigStoreError::InvalidValue {
                    section: section.name.clone(),
                    key: "scm".to_string(),
                    reason: e.to_string(),
                }
            })?;
            repository = repository.with_scm(scm);
        }

        Ok(repository)
    }

    fn expand_home(&self, raw: &str) -> PathBuf {
        match (&self.home_dir, raw) {
            (Some(home), "~") => home.clone(),
            (Some(home), _) if raw.starts_with("~/") => home.join(&raw[2..]),
            _ => PathBuf::from(raw),
        }
    }
}
