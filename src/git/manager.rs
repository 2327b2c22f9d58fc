//! Branch and history operations over a [`LineSource`].

use std::sync::Arc;

use async_stream::try_stream;
use futures::stream::{self, BoxStream, Stream};
use futures::{StreamExt, TryStreamExt};
use tracing::{debug, trace, warn};

use super::args::{build_log_args, LogOptions, REF_LOG_FORMAT};
use super::blocking::{block_on_lines, collect_lines};
use super::broadcast::{BranchSubscription, CurrentBranchBroadcast};
use super::decode::{
    decode_commit_line, decode_local_branch_line, decode_ref_log_line, decode_remote_branch_line,
};
use super::model::{Branch, Commit, Decoded, RefLogEntry};
use super::{
    to_args, DIRTY_STATUS_ARGS, LOCAL_BRANCHES_ARGS, MERGE_CONFLICT_ARGS, REMOTE_BRANCHES_ARGS,
};
use crate::error::{GitError, Result};
use crate::ports::line_source::LineSource;

/// Commits decoded from a history query.
pub type CommitStream = BoxStream<'static, Result<Commit>>;
/// Branches decoded from a branch listing.
pub type BranchStream = BoxStream<'static, Result<Branch>>;
/// Ref-log entries, newest first.
pub type RefLogStream = BoxStream<'static, Result<RefLogEntry>>;
/// Full commit messages.
pub type MessageStream = BoxStream<'static, Result<String>>;

/// Exposes branches and commit history of one repository.
///
/// Streams are lazy: nothing runs until they are polled, and dropping one
/// cancels the underlying invocation. The current branch is cached in a
/// [`CurrentBranchBroadcast`] seeded from the branch listing on first access
/// and replaced optimistically by [`BranchManager::checkout_branch`].
pub struct BranchManager {
    lines: Arc<dyn LineSource>,
    current: Arc<CurrentBranchBroadcast>,
}

impl BranchManager {
    /// Creates a manager issuing every query through `lines`.
    pub fn new(lines: Arc<dyn LineSource>) -> Self {
        Self {
            lines,
            current: Arc::new(CurrentBranchBroadcast::new()),
        }
    }

    /// Subscribes to the current branch.
    ///
    /// The first subscription starts a background lookup of the checked-out
    /// branch; subscribers see the cached value first, then every change. A
    /// lookup that fails is logged and retried by the next subscription.
    /// Outside a Tokio runtime no lookup starts and only published values
    /// are delivered.
    pub fn current_branch(&self) -> BranchSubscription {
        let subscription = self.current.subscribe();
        if !self.current.claim_seed() {
            return subscription;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime; current branch will not be looked up");
            self.current.release_seed();
            return subscription;
        };

        let lines = Arc::clone(&self.lines);
        let current = Arc::clone(&self.current);
        let task = runtime.spawn(async move {
            match find_current(lines.as_ref()).await {
                Ok(Some(branch)) => {
                    debug!(branch = %branch.name, "seeded current branch");
                    current.publish_seed(branch);
                }
                Ok(None) => {
                    debug!("branch listing has no checked-out branch");
                    current.release_seed();
                }
                Err(err) => {
                    warn!(error = %err, "failed to look up current branch");
                    current.release_seed();
                }
            }
        });
        self.current.track_seed_task(task.abort_handle());
        subscription
    }

    /// The current branch right now: the cached value, or a fresh lookup that
    /// also seeds the cache.
    ///
    /// # Errors
    ///
    /// Returns the listing's failure, or [`GitError::NoCurrentBranch`] when
    /// nothing is checked out.
    pub async fn resolve_current_branch(&self) -> Result<Branch> {
        resolve_current(self.lines.as_ref(), &self.current).await
    }

    /// Checks out `branch`, passing `-f` when `force` is set.
    ///
    /// `branch` is published as the current branch once the checkout
    /// finishes, whether or not it succeeded.
    ///
    /// # Errors
    ///
    /// Returns the checkout's failure.
    pub async fn checkout_branch(&self, branch: &Branch, force: bool) -> Result<()> {
        let mut args = vec!["checkout".to_string(), branch.name.clone()];
        if force {
            args.push("-f".into());
        }

        let outcome = collect_lines(self.lines.invoke(&args, true)).await.map(drop);
        if let Err(err) = &outcome {
            warn!(branch = %branch.name, error = %err, "checkout failed");
        }
        self.current.publish(branch.clone());
        outcome
    }

    /// Counts the commits reachable from `branch`, blocking until done.
    ///
    /// # Errors
    ///
    /// Returns the query's failure, [`GitError::EmptyOutput`] when git prints
    /// nothing, or [`GitError::InvalidCount`] when the first line is not a
    /// number.
    pub fn commit_count(&self, branch: &Branch) -> Result<u64> {
        let args = vec!["rev-list".to_string(), "--count".to_string(), branch.name.clone()];
        let lines = block_on_lines(Arc::clone(&self.lines), args)?;
        let line = lines.first().ok_or(GitError::EmptyOutput("commit count"))?;
        line.trim().parse().map_err(|source| GitError::InvalidCount {
            line: line.clone(),
            source,
        })
    }

    /// Full message of `commit`, blocking until done.
    ///
    /// # Errors
    ///
    /// Returns the query's failure.
    pub fn commit_message_long(&self, commit: &Commit) -> Result<String> {
        let lines = block_on_lines(Arc::clone(&self.lines), message_args(&commit.sha))?;
        Ok(join_message(&lines))
    }

    /// Full messages of the commits on the current branch after `parent`.
    ///
    /// Uses the cached current branch, looking it up first when nothing has
    /// been published yet. Yields [`GitError::NoCurrentBranch`] when no
    /// branch is checked out.
    pub fn commit_messages_after_parent(&self, parent: &Commit) -> MessageStream {
        messages_after(Arc::clone(&self.lines), Arc::clone(&self.current), parent.sha.clone())
            .boxed()
    }

    /// History of `branch` with the given paging and shaping options.
    ///
    /// A `skip` or `limit` of zero disables that bound. Malformed records are
    /// skipped.
    pub fn commits_for_branch(
        &self,
        branch: &Branch,
        skip: usize,
        limit: usize,
        options: LogOptions,
    ) -> CommitStream {
        let lines = Arc::clone(&self.lines);
        commit_history(lines, Some(branch.clone()), skip, limit, options, String::new()).boxed()
    }

    /// Local branches, the checked-out one flagged current.
    pub fn local_branches(&self) -> BranchStream {
        self.lines
            .invoke(&to_args(LOCAL_BRANCHES_ARGS), false)
            .map_ok(|line| decode_local_branch_line(&line))
            .boxed()
    }

    /// Remote-tracking branches.
    pub fn remote_branches(&self) -> BranchStream {
        self.lines
            .invoke(&to_args(REMOTE_BRANCHES_ARGS), false)
            .map_ok(|line| decode_remote_branch_line(&line))
            .boxed()
    }

    /// Local and remote branches interleaved as they arrive.
    pub fn local_and_remote_branches(&self) -> BranchStream {
        stream::select(self.local_branches(), self.remote_branches()).boxed()
    }

    /// Upstream of `branch`. Tracking lookup is not supported; always `None`.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn remote_branch(&self, branch: &Branch) -> Option<Branch> {
        trace!(branch = %branch.name, "remote tracking lookup not supported");
        None
    }

    /// Whether a merge left unmerged paths behind.
    ///
    /// # Errors
    ///
    /// Returns the query's failure.
    pub async fn is_merge_conflict(&self) -> Result<bool> {
        self.has_output(MERGE_CONFLICT_ARGS).await
    }

    /// Whether the working tree has changes or untracked files.
    ///
    /// # Errors
    ///
    /// Returns the query's failure.
    pub async fn is_working_directory_dirty(&self) -> Result<bool> {
        self.has_output(DIRTY_STATUS_ARGS).await
    }

    /// Ref-log of `branch`, or of `HEAD` when `None`. A `limit` of zero
    /// returns every entry.
    pub fn ref_log(&self, branch: Option<&Branch>, limit: usize) -> RefLogStream {
        let mut args = to_args(&["reflog", "show", "--date=iso-strict", REF_LOG_FORMAT]);
        if limit > 0 {
            args.push(format!("--max-count={limit}"));
        }
        args.push(branch.map_or_else(|| "HEAD".to_string(), |b| b.name.clone()));

        self.lines
            .invoke(&args, false)
            .try_filter_map(|line| async move {
                Ok(match decode_ref_log_line(&line) {
                    Decoded::Entity(entry) => Some(entry),
                    Decoded::Skipped { fields } => {
                        trace!(fields, "skipping malformed ref-log record");
                        None
                    }
                })
            })
            .boxed()
    }

    /// Ends every current-branch subscription and stops a pending lookup.
    pub fn dispose(&self) {
        self.current.close();
    }

    async fn has_output(&self, args: &[&str]) -> Result<bool> {
        let mut output = self.lines.invoke(&to_args(args), false);
        Ok(output.try_next().await?.is_some())
    }
}

impl Drop for BranchManager {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Marks git's placeholder for a detached HEAD, as in `* (HEAD detached at 1a2b3c4)`.
const DETACHED_PREFIX: char = '(';

async fn find_current(lines: &dyn LineSource) -> Result<Option<Branch>> {
    let mut listing = lines.invoke(&to_args(LOCAL_BRANCHES_ARGS), false);
    while let Some(line) = listing.try_next().await? {
        let branch = decode_local_branch_line(&line);
        if branch.is_current {
            if branch.name.starts_with(DETACHED_PREFIX) {
                debug!(listing = %branch.name, "HEAD is detached");
                return Ok(None);
            }
            return Ok(Some(branch));
        }
    }
    Ok(None)
}

async fn resolve_current(
    lines: &dyn LineSource,
    current: &CurrentBranchBroadcast,
) -> Result<Branch> {
    if let Some(branch) = current.latest() {
        return Ok(branch);
    }
    let branch = find_current(lines).await?.ok_or(GitError::NoCurrentBranch)?;
    current.publish_seed(branch.clone());
    Ok(branch)
}

fn message_args(sha: &str) -> Vec<String> {
    vec!["log".to_string(), "-1".to_string(), "--format=%B".to_string(), sha.to_string()]
}

fn join_message(lines: &[String]) -> String {
    lines.join("\n").trim_end().to_string()
}

fn commit_history(
    lines: Arc<dyn LineSource>,
    scope: Option<Branch>,
    skip: usize,
    limit: usize,
    options: LogOptions,
    revision_range: String,
) -> impl Stream<Item = Result<Commit>> + Send + 'static {
    try_stream! {
        let built =
            build_log_args(lines.as_ref(), scope.as_ref(), skip, limit, options, &revision_range)
                .await?;
        let mut args = vec!["log".to_string()];
        args.extend(built);

        let mut output = lines.invoke(&args, false);
        while let Some(line) = output.try_next().await? {
            match decode_commit_line(&line) {
                Decoded::Entity(commit) => yield commit,
                Decoded::Skipped { fields } => trace!(fields, "skipping malformed history record"),
            }
        }
    }
}

fn messages_after(
    lines: Arc<dyn LineSource>,
    current: Arc<CurrentBranchBroadcast>,
    parent_sha: String,
) -> impl Stream<Item = Result<String>> + Send + 'static {
    try_stream! {
        let branch = resolve_current(lines.as_ref(), &current).await?;
        let range = format!("{parent_sha}..HEAD");
        let mut commits = Box::pin(commit_history(
            Arc::clone(&lines),
            Some(branch),
            0,
            0,
            LogOptions::default(),
            range,
        ));
        while let Some(commit) = commits.try_next().await? {
            let body = collect_lines(lines.invoke(&message_args(&commit.sha), false)).await?;
            yield join_message(&body);
        }
    }
}
