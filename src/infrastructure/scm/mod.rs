/// SCM (Source Control Management) operations infrastructure
///
/// This module provides a unified interface over git and Mercurial
/// working copies.
pub mod git_scm;
pub mod hg_scm;
pub mod scm_factory;
pub mod scm_interface;

pub use scm_factory::{ScmFactory, ScmProvider};
pub use scm_interface::{
    ChangeKind, CommitOptions, FileChange, PushOptions, PushOutcome, ScmError, ScmOperations,
    UpdateStats,
};

#[cfg(test)]
pub use scm_interface::MockScmOperations;
