//! `branchlog branches` and `branchlog current` commands.

use std::io::Write;

use futures::TryStreamExt;

use super::{git_failed, write_failed};
use crate::context::ServiceContext;
use crate::git::Branch;

/// Which branches `branches` lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Local branches only.
    Local,
    /// Remote-tracking branches only.
    Remote,
    /// Both, interleaved as git produces them.
    All,
}

impl Listing {
    /// Maps the `--remote` and `--all` flags; `--all` wins.
    #[must_use]
    pub fn from_flags(remote: bool, all: bool) -> Self {
        match (remote, all) {
            (_, true) => Self::All,
            (true, false) => Self::Remote,
            (false, false) => Self::Local,
        }
    }
}

/// Execute the `branches` command.
///
/// # Errors
///
/// Returns an error string if a listing fails or output cannot be written.
pub async fn list(
    ctx: &ServiceContext,
    listing: Listing,
    json: bool,
    out: &mut impl Write,
) -> Result<(), String> {
    let manager = ctx.branch_manager();
    let mut branches = match listing {
        Listing::Local => manager.local_branches(),
        Listing::Remote => manager.remote_branches(),
        Listing::All => manager.local_and_remote_branches(),
    };

    while let Some(branch) = branches.try_next().await.map_err(git_failed)? {
        if json {
            let line = serde_json::to_string(&branch)
                .map_err(|e| format!("Failed to serialize branch: {e}"))?;
            writeln!(out, "{line}").map_err(write_failed)?;
        } else {
            writeln!(out, "{}", render(&branch)).map_err(write_failed)?;
        }
    }
    Ok(())
}

/// Execute the `current` command.
///
/// # Errors
///
/// Returns an error string if no branch is checked out or the lookup fails.
pub async fn current(ctx: &ServiceContext, out: &mut impl Write) -> Result<(), String> {
    let branch = ctx.branch_manager().resolve_current_branch().await.map_err(git_failed)?;
    writeln!(out, "{}", branch.name).map_err(write_failed)
}

fn render(branch: &Branch) -> String {
    let marker = if branch.is_current { '*' } else { ' ' };
    format!("{marker} {}", branch.name)
}
