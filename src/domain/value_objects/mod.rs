pub mod branch_name;
pub mod scm_type;

pub use branch_name::{BranchName, BranchNameError};
pub use scm_type::{ScmType, ScmTypeError};
