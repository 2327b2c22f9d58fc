//! `branchlog log`, `count`, `message` and `since` commands.

use std::io::Write;

use futures::TryStreamExt;

use super::{git_failed, write_failed};
use crate::cli::LogArgs;
use crate::context::ServiceContext;
use crate::git::{Branch, Commit, LogOptions};

/// Execute the `log` command.
///
/// Without a branch argument the checked-out branch is used.
///
/// # Errors
///
/// Returns an error string if the branch cannot be resolved, the history
/// query fails, or output cannot be written.
pub async fn log(ctx: &ServiceContext, args: &LogArgs, out: &mut impl Write) -> Result<(), String> {
    let manager = ctx.branch_manager();
    let branch = match &args.branch {
        Some(name) => Branch::local(name.as_str()),
        None => manager.resolve_current_branch().await.map_err(git_failed)?,
    };
    let options = LogOptions::default()
        .include_merges(args.merges)
        .topological_order(args.topo)
        .branch_only_and_parent(args.branch_only);

    let mut commits = manager.commits_for_branch(&branch, args.skip, args.limit, options);
    while let Some(commit) = commits.try_next().await.map_err(git_failed)? {
        if args.json {
            let line = serde_json::to_string(&commit)
                .map_err(|e| format!("Failed to serialize commit: {e}"))?;
            writeln!(out, "{line}").map_err(write_failed)?;
        } else {
            writeln!(out, "{}", render(&commit)).map_err(write_failed)?;
        }
    }
    Ok(())
}

/// Execute the `count` command.
///
/// # Errors
///
/// Returns an error string if the count query fails or is not a number.
pub fn count(ctx: &ServiceContext, branch: &str, out: &mut impl Write) -> Result<(), String> {
    let count = ctx.branch_manager().commit_count(&Branch::local(branch)).map_err(git_failed)?;
    writeln!(out, "{count}").map_err(write_failed)
}

/// Execute the `message` command.
///
/// # Errors
///
/// Returns an error string if the message query fails.
pub fn message(ctx: &ServiceContext, sha: &str, out: &mut impl Write) -> Result<(), String> {
    let commit = Commit {
        sha: sha.to_string(),
        ..Commit::default()
    };
    let message = ctx.branch_manager().commit_message_long(&commit).map_err(git_failed)?;
    writeln!(out, "{message}").map_err(write_failed)
}

/// Execute the `since` command: full messages after `parent` on the current
/// branch, separated by blank lines.
///
/// # Errors
///
/// Returns an error string if no branch is checked out or a query fails.
pub async fn since(ctx: &ServiceContext, parent: &str, out: &mut impl Write) -> Result<(), String> {
    let parent = Commit {
        sha: parent.to_string(),
        ..Commit::default()
    };
    let manager = ctx.branch_manager();
    let mut messages = manager.commit_messages_after_parent(&parent);

    let mut first = true;
    while let Some(message) = messages.try_next().await.map_err(git_failed)? {
        if !first {
            writeln!(out).map_err(write_failed)?;
        }
        writeln!(out, "{message}").map_err(write_failed)?;
        first = false;
    }
    Ok(())
}

fn render(commit: &Commit) -> String {
    let date = commit.commit_date.format("%Y-%m-%d");
    let mut line = format!("{} {date} {}", commit.short_sha, commit.author_name);
    if !commit.refs.is_empty() {
        line.push_str(&format!(" ({})", commit.refs));
    }
    line.push_str("  ");
    line.push_str(&commit.message_short);
    line
}
