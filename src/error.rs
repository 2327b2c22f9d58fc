//! Error type shared by the line source, decoders and the branch manager.

use std::num::ParseIntError;

/// Result alias used across the crate.
pub type Result<T, E = GitError> = std::result::Result<T, E>;

/// Failures raised while querying git or aggregating its output.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// git exited with a nonzero status.
    #[error("`git {command}` exited with code {exit_code}: {stderr}")]
    Process {
        /// The invoked command line, without the program name.
        command: String,
        /// Process exit code (`-1` when terminated by a signal).
        exit_code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Spawning git or reading its pipes failed.
    #[error("git I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A commit count query printed something other than an integer.
    #[error("expected a commit count, git printed {line:?}")]
    InvalidCount {
        /// The offending output line.
        line: String,
        /// The underlying conversion failure.
        #[source]
        source: ParseIntError,
    },

    /// An aggregating query needed at least one line and got none.
    #[error("git printed nothing for {0}")]
    EmptyOutput(&'static str),

    /// No checked-out branch could be found (detached HEAD or empty repository).
    #[error("no branch is currently checked out")]
    NoCurrentBranch,

    /// A replayed cassette interaction could not be decoded.
    #[error("cassette replay failed: {0}")]
    Replay(String),

    /// The worker thread running a blocking query panicked.
    #[error("blocking git query worker panicked")]
    WorkerPanicked,
}
