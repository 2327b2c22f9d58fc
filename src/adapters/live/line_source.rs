//! Live line source that spawns the `git` CLI through `tokio::process`.

use std::path::PathBuf;
use std::process::Stdio;

use async_stream::try_stream;
use futures::Stream;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, trace};

use crate::config::GitConfig;
use crate::error::GitError;
use crate::ports::line_source::{LineSource, LineStream};

/// Live line source that shells out to git.
#[derive(Debug, Clone)]
pub struct LiveLineSource {
    program: PathBuf,
    work_dir: Option<PathBuf>,
}

impl LiveLineSource {
    /// Creates a line source running `config.program` inside `config.work_dir`.
    #[must_use]
    pub fn new(config: &GitConfig) -> Self {
        Self {
            program: config.program.clone(),
            work_dir: config.work_dir.clone(),
        }
    }
}

/// Splits argument tokens into the words handed to the process.
fn command_words(args: &[String]) -> Vec<String> {
    args.iter().flat_map(|token| token.split_whitespace()).map(str::to_owned).collect()
}

impl LineSource for LiveLineSource {
    fn invoke(&self, args: &[String], show_output: bool) -> LineStream {
        let words = command_words(args);
        let command_line = words.join(" ");

        let mut command = Command::new(&self.program);
        command
            .args(&words)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.work_dir {
            command.current_dir(dir);
        }

        Box::pin(run_git(command, command_line, show_output))
    }
}

/// Spawns `command` and yields its stdout lines, failing on a nonzero exit.
fn run_git(
    mut command: Command,
    command_line: String,
    show_output: bool,
) -> impl Stream<Item = Result<String, GitError>> + Send {
    try_stream! {
        debug!(command = %command_line, "invoking git");
        let mut child = command.spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("failed to capture git stdout"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("failed to capture git stderr"))?;

        // Drain stderr concurrently so a chatty git cannot block on a full pipe.
        let stderr_task = tokio::spawn(async move {
            let mut captured = String::new();
            stderr.read_to_string(&mut captured).await.map(|_| captured)
        });

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            if show_output {
                info!(target: "branchlog::git", "{line}");
            } else {
                trace!(target: "branchlog::git", "{line}");
            }
            yield line;
        }

        let status = child.wait().await?;
        let captured = stderr_task.await.map_err(std::io::Error::other)??;
        if !status.success() {
            Err::<(), _>(GitError::Process {
                command: command_line,
                exit_code: status.code().unwrap_or(-1),
                stderr: captured.trim().to_string(),
            })?;
        }
    }
}
