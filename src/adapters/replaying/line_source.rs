//! Replaying adapter for the `LineSource` port.

use std::sync::Mutex;

use futures::stream;
use tracing::warn;

use crate::cassette::format::{InvokeInput, InvokeOutput, GIT_PORT, INVOKE_METHOD};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GitError;
use crate::ports::line_source::{LineSource, LineStream};

/// Replays recorded git output from a cassette.
///
/// Interactions are taken in recorded order at `invoke` time, so the order
/// of invocations (not the order streams are polled in) must match the recording.
pub struct ReplayingLineSource {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingLineSource {
    /// Creates a new replaying line source from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

/// Turns a recorded outcome back into line source items.
fn replay_output(args: &[String], output: serde_json::Value) -> Vec<Result<String, GitError>> {
    match serde_json::from_value::<InvokeOutput>(output) {
        Ok(InvokeOutput::Ok(lines)) => lines.into_iter().map(Ok).collect(),
        Ok(InvokeOutput::Err { exit_code, stderr }) => {
            vec![Err(GitError::Process {
                command: args.join(" "),
                exit_code,
                stderr,
            })]
        }
        Err(e) => vec![Err(GitError::Replay(format!("git::invoke output: {e}")))],
    }
}

impl LineSource for ReplayingLineSource {
    fn invoke(&self, args: &[String], _show_output: bool) -> LineStream {
        let interaction = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            replayer.next_interaction(GIT_PORT, INVOKE_METHOD)
        };

        if let Ok(recorded) = serde_json::from_value::<InvokeInput>(interaction.input.clone()) {
            if recorded.args != args {
                warn!(
                    seq = interaction.seq,
                    recorded = ?recorded.args,
                    requested = ?args,
                    "replayed git arguments differ from the recording"
                );
            }
        }

        Box::pin(stream::iter(replay_output(args, interaction.output)))
    }
}
