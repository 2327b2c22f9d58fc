//! Branch and history queries over the git line source.
//!
//! [`args`] builds history arguments, [`decode`] turns output lines into the
//! entities in [`model`], and [`manager::BranchManager`] ties them to a
//! [`LineSource`](crate::ports::LineSource).

pub mod args;
pub mod blocking;
pub mod broadcast;
pub mod decode;
pub mod manager;
pub mod model;

pub use args::{build_log_args, log_args, LogOptions};
pub use broadcast::{BranchSubscription, CurrentBranchBroadcast};
pub use manager::BranchManager;
pub use model::{Branch, Commit, Decoded, RefLogEntry};

/// `git branch`: local branches with the current marker.
pub const LOCAL_BRANCHES_ARGS: &[&str] = &["branch"];
/// `git branch -r`: remote-tracking branches.
pub const REMOTE_BRANCHES_ARGS: &[&str] = &["branch", "-r"];
/// Lists unmerged paths; any output means a merge conflict is in progress.
pub const MERGE_CONFLICT_ARGS: &[&str] = &["diff", "--name-only", "--diff-filter=U"];
/// Porcelain status ignoring dirty submodules and listing every untracked file.
pub const DIRTY_STATUS_ARGS: &[&str] =
    &["status", "--porcelain", "--ignore-submodules=dirty", "--untracked-files=all"];

pub(crate) fn to_args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|token| (*token).to_string()).collect()
}
