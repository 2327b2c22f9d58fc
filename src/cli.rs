//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `branchlog`.
#[derive(Debug, Parser)]
#[command(name = "branchlog", version, about = "Browse git branches and commit history")]
pub struct Cli {
    /// Run as if git was started in this directory.
    #[arg(short = 'C', global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List branches.
    Branches {
        /// List remote-tracking branches instead of local ones.
        #[arg(long, conflicts_with = "all")]
        remote: bool,
        /// List local and remote-tracking branches.
        #[arg(long)]
        all: bool,
        /// Print one JSON object per line.
        #[arg(long)]
        json: bool,
    },
    /// Print the checked-out branch.
    Current,
    /// Show the history of a branch.
    Log(LogArgs),
    /// Count the commits reachable from a branch.
    Count {
        /// Branch name.
        branch: String,
    },
    /// Print the full message of a commit.
    Message {
        /// Commit sha.
        sha: String,
    },
    /// Print the full messages of commits on the current branch after a parent.
    Since {
        /// Sha of the parent commit.
        parent: String,
    },
    /// Check out a branch.
    Checkout {
        /// Branch name.
        branch: String,
        /// Discard local changes.
        #[arg(long, short)]
        force: bool,
    },
    /// Show the ref-log of a branch, or of HEAD.
    Reflog {
        /// Branch name; defaults to HEAD.
        branch: Option<String>,
        /// Maximum number of entries; 0 shows all.
        #[arg(long, default_value_t = 0)]
        limit: usize,
    },
    /// Report working tree and merge state.
    Status,
}

/// Options of the `log` subcommand.
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Branch name; defaults to the checked-out branch.
    pub branch: Option<String>,
    /// Number of commits to skip.
    #[arg(long, default_value_t = 0)]
    pub skip: usize,
    /// Maximum number of commits; 0 shows all.
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
    /// Include merge commits and follow every parent.
    #[arg(long)]
    pub merges: bool,
    /// Order commits topologically.
    #[arg(long)]
    pub topo: bool,
    /// Hide commits reachable from any other local branch.
    #[arg(long)]
    pub branch_only: bool,
    /// Print one JSON object per line.
    #[arg(long)]
    pub json: bool,
}
