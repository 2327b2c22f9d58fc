//! Environment-driven configuration for the git line source.

use std::env;
use std::path::PathBuf;

/// Env var naming the git executable.
pub const GIT_PROGRAM_VAR: &str = "BRANCHLOG_GIT";
/// Env var naming the repository directory.
pub const REPO_DIR_VAR: &str = "BRANCHLOG_DIR";
/// Env var pointing at a directory to record cassettes into.
pub const RECORD_VAR: &str = "BRANCHLOG_RECORD";
/// Env var pointing at a cassette file to replay git output from.
pub const REPLAY_VAR: &str = "BRANCHLOG_REPLAY";
/// Env var holding the `tracing` filter directive.
pub const LOG_VAR: &str = "BRANCHLOG_LOG";

/// Where and how git is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitConfig {
    /// The git executable, resolved through `PATH` when relative.
    pub program: PathBuf,
    /// Repository directory; the process working directory when `None`.
    pub work_dir: Option<PathBuf>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            work_dir: None,
        }
    }
}

impl GitConfig {
    /// Reads `BRANCHLOG_GIT` and `BRANCHLOG_DIR`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            program: env::var_os(GIT_PROGRAM_VAR).map_or(defaults.program, PathBuf::from),
            work_dir: env::var_os(REPO_DIR_VAR).map(PathBuf::from),
        }
    }

    /// Overrides the repository directory (the CLI's `-C`).
    #[must_use]
    pub fn with_work_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.work_dir = dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runs_git_from_path_in_cwd() {
        let config = GitConfig::default();
        assert_eq!(config.program, PathBuf::from("git"));
        assert!(config.work_dir.is_none());
    }

    #[test]
    fn cli_dir_overrides_only_when_given() {
        let base = GitConfig {
            program: "git".into(),
            work_dir: Some("/repo".into()),
        };
        assert_eq!(base.clone().with_work_dir(None).work_dir, Some(PathBuf::from("/repo")));
        assert_eq!(
            base.with_work_dir(Some("/other".into())).work_dir,
            Some(PathBuf::from("/other"))
        );
    }
}
