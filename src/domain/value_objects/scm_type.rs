use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Version control system backing a working copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScmType {
    /// Git version control system
    Git,
    /// Mercurial version control system
    #[default]
    Hg,
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScmType::Git => write!(f, "git"),
            ScmType::Hg => write!(f, "hg"),
        }
    }
}

impl FromStr for ScmType {
    type Err = ScmTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "git" => Ok(ScmType::Git),
            "hg" | "mercurial" => Ok(ScmType::Hg),
            _ => Err(ScmTypeError::UnsupportedScmType(s.to_string())),
        }
    }
}

impl ScmType {
    /// Branch a fresh working copy is expected to sit on
    pub fn default_branch(&self) -> &'static str {
        match self {
            ScmType::Git => "main",
            ScmType::Hg => "default",
        }
    }

    /// Get the metadata directory name for this SCM
    pub fn metadata_dir(&self) -> &'static str {
        match self {
            ScmType::Git => ".git",
            ScmType::Hg => ".hg",
        }
    }

    /// Get the standard executable name for this SCM
    pub fn executable_name(&self) -> &'static str {
        match self {
            ScmType::Git => "git",
            ScmType::Hg => "hg",
        }
    }

    /// Guess the SCM from a remote URL
    ///
    /// Only unmistakable git URLs are recognised; anything else is left to the caller.
    pub fn from_remote(remote: &str) -> Option<ScmType> {
        let remote = remote.trim().trim_end_matches('/');
        let is_git = remote.ends_with(".git")
            || remote.starts_with("git://")
            || remote.starts_with("git@")
            || remote.starts_with("git+ssh://");
        is_git.then_some(ScmType::Git)
    }

    /// Detect the SCM of a working copy from its metadata directory
    pub fn detect(path: &Path) -> Option<ScmType> {
        [ScmType::Hg, ScmType::Git]
            .into_iter()
            .find(|scm| path.join(scm.metadata_dir()).exists())
    }
}

/// Errors that can occur when working with SCM types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScmTypeError {
    /// The specified SCM type is not supported
    #[error("Unsupported SCM type: '{0}'. Supported types are: git, hg")]
    UnsupportedScmType(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scm_type_from_str() {
        assert_eq!("git".parse::<ScmType>().unwrap(), ScmType::Git);
        assert_eq!("hg".parse::<ScmType>().unwrap(), ScmType::Hg);
        assert_eq!("Mercurial".parse::<ScmType>().unwrap(), ScmType::Hg);

        assert!("svn".parse::<ScmType>().is_err());
    }

    #[test]
    fn test_scm_type_display() {
        assert_eq!(ScmType::Git.to_string(), "git");
        assert_eq!(ScmType::Hg.to_string(), "hg");
    }

    #[test]
    fn test_default_branches() {
        assert_eq!(ScmType::Git.default_branch(), "main");
        assert_eq!(ScmType::Hg.default_branch(), "default");
    }

    #[test]
    fn test_detect() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(ScmType::detect(temp_dir.path()), None);

        std::fs::create_dir(temp_dir.path().join(".hg")).unwrap();
        assert_eq!(ScmType::detect(temp_dir.path()), Some(ScmType::Hg));
    }

    #[test]
    fn test_from_remote() {
        assert_eq!(
            ScmType::from_remote("git@github.com:example/web.git"),
            Some(ScmType::Git)
        );
        assert_eq!(
            ScmType::from_remote("https://example.com/web.git/"),
            Some(ScmType::Git)
        );
        assert_eq!(ScmType::from_remote("ssh://hg@example.com/api"), None);
        assert_eq!(ScmType::from_remote("https://hg.example.com/api"), None);
    }

    #[test]
    fn test_mercurial_is_the_default() {
        assert_eq!(ScmType::default(), ScmType::Hg);
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&ScmType::Hg).unwrap();
        assert_eq!(json, "\"hg\"");

        let deserialized: ScmType = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, ScmType::Hg);
    }
}
