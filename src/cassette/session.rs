//! Recording session owning the git cassette recorder.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::format::GIT_PORT;
use super::recorder::CassetteRecorder;

/// Owns the recorder shared with the recording line source.
///
/// Cassettes land in a timestamped directory under the requested root.
pub struct RecordingSession {
    /// Recorder for git invocations.
    pub git: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a session writing to `<root>/<timestamp>/git.cassette.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cassette directory already exists
    /// - The directory cannot be created
    pub fn new(root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let path = output_dir.join(format!("{GIT_PORT}.cassette.yaml"));
        let name = format!("{timestamp}-{GIT_PORT}");
        let recorder = CassetteRecorder::new(path, name, head_commit());
        Ok(Self {
            git: Arc::new(Mutex::new(recorder)),
            output_dir,
        })
    }

    /// Directory holding this session's cassettes.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the cassette to disk.
    ///
    /// Every recording line source holding the recorder must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder is still shared or the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.git)
            .map_err(|_| "Recording line source still holds the git recorder".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock for git poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write git cassette: {e}"))?;
        Ok(self.output_dir)
    }
}

/// Current HEAD of the surrounding repository, or "unknown" when unavailable.
fn head_commit() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        warn!("could not read HEAD commit for cassette metadata, using 'unknown'");
        "unknown".to_string()
    })
}
