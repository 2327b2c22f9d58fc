//! Argument construction for history queries.

use futures::TryStreamExt;

use super::decode::decode_local_branch_line;
use super::model::Branch;
use super::{to_args, LOCAL_BRANCHES_ARGS};
use crate::error::Result;
use crate::ports::line_source::LineSource;

/// Decorated one-record-per-line history format.
///
/// Fields, separated by U+001F: full sha, short sha, parent shas, strict ISO
/// committer date, committer name and email, author name and email, ref
/// decoration, subject. The trailing separator leaves an empty eleventh part.
pub const HISTORY_FORMAT: &str =
    "--format=%H%x1f%h%x1f%P%x1f%cI%x1f%cn%x1f%ce%x1f%an%x1f%ae%x1f%D%x1f%s%x1f";

/// Ref-log format: full sha, short sha, selector with date, subject.
pub const REF_LOG_FORMAT: &str = "--format=%H%x1f%h%x1f%gd%x1f%gs";

/// Switches shaping a history query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Keep merge commits; when off the query also follows first parents only.
    pub include_merges: bool,
    /// Order commits topologically instead of by date.
    pub topological_order: bool,
    /// Exclude commits reachable from any other local branch.
    pub branch_only_and_parent: bool,
}

impl LogOptions {
    /// Sets [`LogOptions::include_merges`].
    #[must_use]
    pub fn include_merges(mut self, on: bool) -> Self {
        self.include_merges = on;
        self
    }

    /// Sets [`LogOptions::topological_order`].
    #[must_use]
    pub fn topological_order(mut self, on: bool) -> Self {
        self.topological_order = on;
        self
    }

    /// Sets [`LogOptions::branch_only_and_parent`].
    #[must_use]
    pub fn branch_only_and_parent(mut self, on: bool) -> Self {
        self.branch_only_and_parent = on;
        self
    }
}

/// Builds history arguments from already-resolved inputs.
///
/// `excluded` holds the branches for the `--not` clause and is only read when
/// `options.branch_only_and_parent` is set. A `skip` or `limit` of zero adds
/// no token.
#[must_use]
pub fn log_args(
    scope: Option<&Branch>,
    skip: usize,
    limit: usize,
    options: LogOptions,
    revision_range: &str,
    excluded: &[Branch],
) -> Vec<String> {
    let mut args = vec![format!("{revision_range} ")];

    if let Some(branch) = scope {
        args.push(branch.name.clone());
    }
    if skip > 0 {
        args.push(format!("--skip={skip}"));
    }
    if limit > 0 {
        args.push(format!("--max-count={limit}"));
    }

    args.push("--full-history".into());
    if options.topological_order {
        args.push("--topo-order".into());
    }
    if !options.include_merges {
        args.push("--no-merges".into());
        args.push("--first-parent".into());
    }

    args.push(HISTORY_FORMAT.into());
    args.push("--decorate=full".into());
    args.push("--date=iso".into());

    if options.branch_only_and_parent {
        let names: Vec<&str> = excluded
            .iter()
            .filter(|branch| !scope.is_some_and(|scope| scope.same_ref(branch)))
            .map(|branch| branch.name.as_str())
            .collect();
        args.push(format!("--not {}", names.join(" ")).trim_end().to_string());
        args.push("--".into());
    }

    args
}

/// Builds history arguments, listing local branches first when the exclusion
/// clause needs them.
///
/// The listing runs to completion before this returns, so the outer query is
/// never started against a partial exclusion set.
///
/// # Errors
///
/// Returns the listing's failure; the caller must not issue the outer query.
pub async fn build_log_args(
    lines: &dyn LineSource,
    scope: Option<&Branch>,
    skip: usize,
    limit: usize,
    options: LogOptions,
    revision_range: &str,
) -> Result<Vec<String>> {
    let excluded = if options.branch_only_and_parent {
        lines
            .invoke(&to_args(LOCAL_BRANCHES_ARGS), false)
            .map_ok(|line| decode_local_branch_line(&line))
            .try_collect::<Vec<_>>()
            .await?
    } else {
        Vec::new()
    };
    Ok(log_args(scope, skip, limit, options, revision_range, &excluded))
}
