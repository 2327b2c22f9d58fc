//! Command dispatch and handlers.

pub mod branches;
pub mod checkout;
pub mod history;
pub mod reflog;
pub mod status;

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::{GitConfig, RECORD_VAR, REPLAY_VAR};
use crate::context::ServiceContext;

/// Dispatch a parsed command line to its handler.
///
/// When `BRANCHLOG_RECORD` is set to a directory path, every git invocation
/// is recorded to a cassette in that directory. When `BRANCHLOG_REPLAY`
/// names a cassette file, git output is served from it instead of git.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = GitConfig::from_env().with_work_dir(cli.dir.clone());
    let (ctx, session) = if let Ok(path) = env::var(RECORD_VAR) {
        let (ctx, session) = ServiceContext::recording_at(PathBuf::from(path), &config)?;
        (ctx, Some(session))
    } else if let Ok(path) = env::var(REPLAY_VAR) {
        (ServiceContext::replaying(Path::new(&path))?, None)
    } else {
        (ServiceContext::live(&config), None)
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let mut stdout = std::io::stdout().lock();
    let result = runtime.block_on(dispatch_with_context(&cli.command, &ctx, &mut stdout));

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Tasks and the context hold the recorder; release them first
        drop(runtime);
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    out: &mut impl Write,
) -> Result<(), String> {
    match command {
        Command::Branches { remote, all, json } => {
            branches::list(ctx, branches::Listing::from_flags(*remote, *all), *json, out).await
        }
        Command::Current => branches::current(ctx, out).await,
        Command::Log(args) => history::log(ctx, args, out).await,
        Command::Count { branch } => history::count(ctx, branch, out),
        Command::Message { sha } => history::message(ctx, sha, out),
        Command::Since { parent } => history::since(ctx, parent, out).await,
        Command::Checkout { branch, force } => checkout::run(ctx, branch, *force, out).await,
        Command::Reflog { branch, limit } => reflog::run(ctx, branch.as_deref(), *limit, out).await,
        Command::Status => status::run(ctx, out).await,
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

pub(crate) fn write_failed(err: std::io::Error) -> String {
    format!("Failed to write output: {err}")
}

pub(crate) fn git_failed(err: crate::error::GitError) -> String {
    format!("git: {err}")
}
