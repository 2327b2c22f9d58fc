//! `branchlog status` command.

use std::io::Write;

use super::{git_failed, write_failed};
use crate::context::ServiceContext;

/// Execute the `status` command.
///
/// Prints whether the working tree has changes and whether a merge left
/// unmerged paths.
///
/// # Errors
///
/// Returns an error string if either query fails.
pub async fn run(ctx: &ServiceContext, out: &mut impl Write) -> Result<(), String> {
    let manager = ctx.branch_manager();
    let dirty = manager.is_working_directory_dirty().await.map_err(git_failed)?;
    let conflict = manager.is_merge_conflict().await.map_err(git_failed)?;

    writeln!(out, "dirty: {}", yes_no(dirty)).map_err(write_failed)?;
    writeln!(out, "merge conflict: {}", yes_no(conflict)).map_err(write_failed)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
