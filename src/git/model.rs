//! Branch, commit and ref-log entities decoded from git output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A local or remote branch as listed by `git branch`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Branch {
    /// Friendly name, e.g. `main` or `origin/main`.
    pub name: String,
    /// Whether the branch came from the remote-tracking listing.
    pub is_remote: bool,
    /// Whether the branch is checked out.
    pub is_current: bool,
}

impl Branch {
    /// A local branch that is not checked out.
    #[must_use]
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_remote: false,
            is_current: false,
        }
    }

    /// A remote-tracking branch.
    #[must_use]
    pub fn remote(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_remote: true,
            is_current: false,
        }
    }

    /// Whether `other` names the same branch, ignoring the current marker.
    #[must_use]
    pub fn same_ref(&self, other: &Branch) -> bool {
        self.name == other.name && self.is_remote == other.is_remote
    }
}

/// One commit decoded from a history record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full 40-character hash.
    pub sha: String,
    /// Abbreviated hash.
    pub short_sha: String,
    /// Parent hashes: none for a root commit, two or more for a merge.
    pub parent_shas: Vec<String>,
    /// Committer date; the Unix epoch when git's value could not be parsed.
    pub commit_date: DateTime<Utc>,
    /// Committer name.
    pub committer_name: String,
    /// Committer email.
    pub committer_email: String,
    /// Author name.
    pub author_name: String,
    /// Author email.
    pub author_email: String,
    /// Raw decoration text (`HEAD -> refs/heads/main, tag: refs/tags/v1`).
    pub refs: String,
    /// Subject line.
    pub message_short: String,
}

impl Commit {
    /// Whether the commit has more than one parent.
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parent_shas.len() > 1
    }
}

/// One ref-log line: where a ref pointed and why it moved there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefLogEntry {
    /// Full hash the ref moved to.
    pub sha: String,
    /// Abbreviated hash.
    pub short_sha: String,
    /// What moved the ref, e.g. `checkout` or `commit (amend)`.
    pub action: String,
    /// Free text following the action.
    pub message_short: String,
    /// When the ref moved; the Unix epoch when unparseable.
    pub date_time: DateTime<Utc>,
}

/// Outcome of decoding one delimited record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    /// The record had the expected shape.
    Entity(T),
    /// The record had the wrong number of fields and was skipped.
    Skipped {
        /// Number of fields actually found.
        fields: usize,
    },
}

impl<T> Decoded<T> {
    /// The decoded entity, dropping the skip reason.
    pub fn entity(self) -> Option<T> {
        match self {
            Self::Entity(value) => Some(value),
            Self::Skipped { .. } => None,
        }
    }
}
