//! Service context bundling the git line source.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::live::LiveLineSource;
use crate::adapters::recording::RecordingLineSource;
use crate::adapters::replaying::ReplayingLineSource;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::GitConfig;
use crate::git::BranchManager;
use crate::ports::line_source::LineSource;

/// Bundles the port trait objects commands run against.
///
/// Constructors wire up different adapter implementations (live, replaying,
/// recording).
pub struct ServiceContext {
    /// Source of git output lines.
    pub lines: Arc<dyn LineSource>,
}

impl ServiceContext {
    /// Creates a live context running the configured git executable.
    #[must_use]
    pub fn live(config: &GitConfig) -> Self {
        Self {
            lines: Arc::new(LiveLineSource::new(config)),
        }
    }

    /// Creates a replaying context from a git cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let replayer = CassetteReplayer::from_path(path)?;
        Ok(Self {
            lines: Arc::new(ReplayingLineSource::new(replayer)),
        })
    }

    /// Creates a recording context that captures every git invocation.
    ///
    /// The returned session must be finished after the context is dropped to
    /// write the cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(
        root: PathBuf,
        config: &GitConfig,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(&root)?;
        let live: Arc<dyn LineSource> = Arc::new(LiveLineSource::new(config));
        let lines = Arc::new(RecordingLineSource::new(live, Arc::clone(&session.git)));
        Ok((Self { lines }, session))
    }

    /// A branch manager over this context's line source.
    #[must_use]
    pub fn branch_manager(&self) -> BranchManager {
        BranchManager::new(Arc::clone(&self.lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use futures::TryStreamExt;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).unwrap();
        std::fs::write(path, yaml).unwrap();
    }

    #[tokio::test]
    async fn replaying_context_serves_branch_listing() {
        let dir = std::env::temp_dir().join("branchlog_ctx_test_replay");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("git.cassette.yaml");
        write_cassette(
            &path,
            vec![Interaction {
                seq: 0,
                port: "git".into(),
                method: "invoke".into(),
                input: json!({"args": ["branch"], "show_output": false}),
                output: json!({"ok": ["* main", "  dev"]}),
            }],
        );

        let ctx = ServiceContext::replaying(&path).unwrap();
        let names: Vec<String> = ctx
            .branch_manager()
            .local_branches()
            .map_ok(|branch| branch.name)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(names, vec!["main", "dev"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn replaying_missing_cassette_fails() {
        let path = std::env::temp_dir().join("branchlog_ctx_missing.cassette.yaml");
        assert!(ServiceContext::replaying(&path).is_err());
    }

    #[test]
    fn recording_context_creates_session_directory() {
        let root = std::env::temp_dir().join("branchlog_ctx_test_record");
        let _ = std::fs::remove_dir_all(&root);

        let (ctx, session) =
            ServiceContext::recording_at(root.clone(), &GitConfig::default()).unwrap();
        assert!(session.output_dir().starts_with(&root));
        drop(ctx);
        let dir = session.finish().unwrap();
        assert!(dir.join("git.cassette.yaml").exists());

        let _ = std::fs::remove_dir_all(&root);
    }
}
