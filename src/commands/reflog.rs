//! `branchlog reflog` command.

use std::io::Write;

use futures::TryStreamExt;

use super::{git_failed, write_failed};
use crate::context::ServiceContext;
use crate::git::Branch;

/// Execute the `reflog` command for `branch`, or `HEAD` when `None`.
///
/// # Errors
///
/// Returns an error string if the ref-log query fails.
pub async fn run(
    ctx: &ServiceContext,
    branch: Option<&str>,
    limit: usize,
    out: &mut impl Write,
) -> Result<(), String> {
    let branch = branch.map(Branch::local);
    let manager = ctx.branch_manager();
    let mut entries = manager.ref_log(branch.as_ref(), limit);

    while let Some(entry) = entries.try_next().await.map_err(git_failed)? {
        let when = entry.date_time.format("%Y-%m-%d %H:%M");
        let written = if entry.action.is_empty() {
            writeln!(out, "{} {when} {}", entry.short_sha, entry.message_short)
        } else {
            writeln!(out, "{} {when} {}: {}", entry.short_sha, entry.action, entry.message_short)
        };
        written.map_err(write_failed)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{ok, printed, replay_context};

    #[tokio::test]
    async fn prints_entries() {
        let entry = [
            "1111111111111111111111111111111111111111",
            "1111111",
            "main@{2024-03-01T10:00:00+00:00}",
            "commit: Add parser",
        ]
        .join("\u{1f}");
        let ctx = replay_context(vec![ok(&[&entry])]);
        let mut out = Vec::new();

        run(&ctx, Some("main"), 1, &mut out).await.unwrap();
        assert_eq!(printed(out), "1111111 2024-03-01 10:00 commit: Add parser\n");
    }
}
