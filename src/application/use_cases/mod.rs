pub mod branch;
pub mod clone;
pub mod commit;
pub mod context;
pub mod diff;
pub mod done;
pub mod push;
pub mod status;
pub mod update;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{CommandContext, UserInterface};
