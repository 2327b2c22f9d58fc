//! Collect-then-block aggregation over a line stream.
//!
//! The blocking entry point drives the stream on its own thread and runtime,
//! never on the caller's, so it is safe to call from code that would
//! otherwise be the one polling the stream.

use std::sync::Arc;
use std::thread;

use futures::TryStreamExt;

use crate::error::{GitError, Result};
use crate::ports::line_source::{LineSource, LineStream};

/// Drains a line stream, failing on the first error.
///
/// # Errors
///
/// Returns the first error yielded by the stream.
pub async fn collect_lines(lines: LineStream) -> Result<Vec<String>> {
    lines.try_collect().await
}

/// Runs one invocation to completion on a dedicated worker thread.
///
/// # Errors
///
/// Returns the invocation's failure, an I/O error if the worker or its
/// runtime cannot start, or [`GitError::WorkerPanicked`].
pub fn block_on_lines(source: Arc<dyn LineSource>, args: Vec<String>) -> Result<Vec<String>> {
    let worker = thread::Builder::new().name("branchlog-query".into()).spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(collect_lines(source.invoke(&args, false)))
    })?;
    worker.join().map_err(|_| GitError::WorkerPanicked)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    struct FixedLines(Vec<&'static str>);

    impl LineSource for FixedLines {
        fn invoke(&self, _args: &[String], _show_output: bool) -> LineStream {
            let items: Vec<Result<String>> = self.0.iter().map(|l| Ok((*l).to_string())).collect();
            Box::pin(stream::iter(items))
        }
    }

    struct Exploding;

    impl LineSource for Exploding {
        fn invoke(&self, _args: &[String], _show_output: bool) -> LineStream {
            panic!("boom");
        }
    }

    #[test]
    fn blocks_until_all_lines_arrive() {
        let lines = block_on_lines(Arc::new(FixedLines(vec!["one", "two"])), vec![]).unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn safe_to_call_from_inside_a_runtime() {
        let lines = block_on_lines(Arc::new(FixedLines(vec!["42"])), vec![]).unwrap();
        assert_eq!(lines, vec!["42"]);
    }

    #[test]
    fn worker_panic_is_reported() {
        let result = block_on_lines(Arc::new(Exploding), vec![]);
        assert!(matches!(result, Err(GitError::WorkerPanicked)));
    }
}
