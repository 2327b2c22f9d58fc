//! Recording adapters that capture interactions to cassettes.

pub mod line_source;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

pub use line_source::RecordingLineSource;

/// Serialize an input and reserve its position in the shared recorder.
///
/// Mirror of the replaying adapter, which takes interactions in the same order.
pub(crate) fn reserve_interaction<I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
) -> u64
where
    I: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.reserve(port, method, input_json)
}

/// Serialize an output into a previously reserved interaction.
///
/// Called from `Drop`; a poisoned lock is recovered.
pub(crate) fn complete_interaction<O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    seq: u64,
    output: &O,
) where
    O: Serialize,
{
    let output_json = serde_json::to_value(output).unwrap_or(serde_json::Value::Null);

    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.complete(seq, output_json);
}
