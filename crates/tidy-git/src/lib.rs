//! Tidy Git - repository access for git-tidy
//!
//! This crate wraps `git2` with the handful of operations git-tidy needs:
//! reading linear commit ranges as raw records, associating tags, resolving
//! revisions, and the primitives the squash engine composes (merge base,
//! soft reset, snapshot ref, index commit, pre-commit hook).

pub mod hooks;
mod log;
mod remote;
mod repository;
mod rewrite;
mod tags;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use hooks::HookOutcome;
pub use log::{LogOrder, LogQuery};
pub use repository::{GitRepo, Result};
pub use rewrite::SNAPSHOT_REF;
pub use tags::TagIndex;
pub use types::{RawCommit, RawSignature, TagInfo};

pub use git2::Oid;
