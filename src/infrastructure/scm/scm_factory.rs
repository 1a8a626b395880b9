use super::git_scm::GitScm;
use super::hg_scm::HgScm;
use super::scm_interface::ScmOperations;
use crate::domain::entities::repository::Repository;
use crate::domain::value_objects::scm_type::ScmType;
use std::sync::Arc;

/// Source of SCM clients for configured repositories
pub trait ScmProvider: Send + Sync {
    /// SCM client able to operate on the given repository
    fn scm_for(&self, repository: &Repository) -> Arc<dyn ScmOperations>;
}

/// Factory for creating SCM implementation instances
#[derive(Debug, Default, Clone, Copy)]
pub struct ScmFactory;

impl ScmFactory {
    /// Create an SCM operations instance for the given SCM type
    pub fn create_scm(scm_type: ScmType) -> Arc<dyn ScmOperations> {
        match scm_type {
            ScmType::Git => Arc::new(GitScm::new()),
            ScmType::Hg => Arc::new(HgScm::new()),
        }
    }
}

impl ScmProvider for ScmFactory {
    fn scm_for(&self, repository: &Repository) -> Arc<dyn ScmOperations> {
        Self::create_scm(repository.scm_type())
    }
}
