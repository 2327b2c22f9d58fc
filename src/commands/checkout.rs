//! `branchlog checkout` command.

use std::io::Write;

use super::{git_failed, write_failed};
use crate::context::ServiceContext;
use crate::git::Branch;

/// Execute the `checkout` command.
///
/// # Errors
///
/// Returns an error string if git refuses the checkout.
pub async fn run(
    ctx: &ServiceContext,
    branch: &str,
    force: bool,
    out: &mut impl Write,
) -> Result<(), String> {
    let branch = Branch::local(branch);
    ctx.branch_manager().checkout_branch(&branch, force).await.map_err(git_failed)?;
    writeln!(out, "Switched to branch '{}'", branch.name).map_err(write_failed)
}
