//! Recording adapter for the `LineSource` port.

use std::sync::{Arc, Mutex};

use async_stream::stream;
use futures::StreamExt;

use super::{complete_interaction, reserve_interaction};
use crate::cassette::format::{InvokeInput, InvokeOutput, GIT_PORT, INVOKE_METHOD};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::GitError;
use crate::ports::line_source::{LineSource, LineStream};

/// Records git invocations while delegating to an inner line source.
///
/// Each invocation takes its cassette position when `invoke` is called, the
/// same moment the replaying adapter consumes it. The output is written when
/// the stream ends or is dropped; a dropped stream keeps the lines read so far.
pub struct RecordingLineSource {
    inner: Arc<dyn LineSource>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingLineSource {
    /// Creates a new recording line source wrapping the given implementation.
    pub fn new(inner: Arc<dyn LineSource>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// A reserved interaction, completed when dropped.
struct PendingInteraction {
    recorder: Arc<Mutex<CassetteRecorder>>,
    seq: u64,
    captured: Vec<String>,
    failure: Option<InvokeOutput>,
}

impl PendingInteraction {
    fn fail(&mut self, err: &GitError) {
        self.failure = Some(InvokeOutput::failure(err));
    }
}

impl Drop for PendingInteraction {
    fn drop(&mut self) {
        let output = self
            .failure
            .take()
            .unwrap_or_else(|| InvokeOutput::Ok(std::mem::take(&mut self.captured)));
        complete_interaction(&self.recorder, self.seq, &output);
    }
}

impl LineSource for RecordingLineSource {
    fn invoke(&self, args: &[String], show_output: bool) -> LineStream {
        let input = InvokeInput {
            args: args.to_vec(),
            show_output,
        };
        let seq = reserve_interaction(&self.recorder, GIT_PORT, INVOKE_METHOD, &input);
        let mut pending = PendingInteraction {
            recorder: Arc::clone(&self.recorder),
            seq,
            captured: Vec::new(),
            failure: None,
        };
        let mut inner = self.inner.invoke(args, show_output);

        Box::pin(stream! {
            while let Some(item) = inner.next().await {
                match item {
                    Ok(line) => {
                        pending.captured.push(line.clone());
                        yield Ok(line);
                    }
                    Err(err) => {
                        pending.fail(&err);
                        yield Err(err);
                        return;
                    }
                }
            }
        })
    }
}
