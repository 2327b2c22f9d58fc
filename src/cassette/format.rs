//! Cassette data structures for recording and replaying git invocations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GitError;

/// Port name used for git line source interactions.
pub const GIT_PORT: &str = "git";
/// Method name used for git line source interactions.
pub const INVOKE_METHOD: &str = "invoke";

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (e.g. "git").
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit hash at recording time.
    pub commit: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

/// Recorded input of one line source invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvokeInput {
    /// Argument tokens exactly as passed to the line source.
    pub args: Vec<String>,
    /// Whether output was shown to the user.
    #[serde(default)]
    pub show_output: bool,
}

/// Recorded outcome of one line source invocation.
///
/// Serialized as `{"ok": [lines]}` or `{"err": {"exit_code": n, "stderr": "..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvokeOutput {
    /// The invocation exited cleanly with these lines.
    Ok(Vec<String>),
    /// The invocation failed.
    Err {
        /// Exit code, `-1` for failures that never produced one.
        exit_code: i32,
        /// Captured standard error or failure description.
        stderr: String,
    },
}

impl InvokeOutput {
    /// Captures a line source failure for recording.
    #[must_use]
    pub fn failure(err: &GitError) -> Self {
        match err {
            GitError::Process { exit_code, stderr, .. } => Self::Err {
                exit_code: *exit_code,
                stderr: stderr.clone(),
            },
            other => Self::Err {
                exit_code: -1,
                stderr: other.to_string(),
            },
        }
    }
}
