//! Line source port: one git invocation as a stream of output lines.

use std::pin::Pin;

use futures::Stream;

use crate::error::GitError;

/// Boxed stream type returned by [`LineSource::invoke`], kept dyn-compatible.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, GitError>> + Send + 'static>>;

/// Runs git and yields its standard output one line at a time.
///
/// Abstracting the process boundary lets the decoders and the branch manager
/// run against recorded cassettes instead of a real repository.
pub trait LineSource: Send + Sync {
    /// Starts a git invocation with the given argument tokens.
    ///
    /// The returned stream is lazy: nothing is spawned until it is first
    /// polled, and dropping it cancels the invocation. Each item is one line
    /// with its trailing newline removed. The stream ends normally on exit
    /// code 0 and yields [`GitError::Process`] otherwise.
    ///
    /// Argument tokens follow the command-line grammar of the history
    /// queries: a token may hold several whitespace-separated words.
    fn invoke(&self, args: &[String], show_output: bool) -> LineStream;
}
