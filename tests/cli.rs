//! Integration tests for top-level CLI behavior.
//!
//! Commands that reach git run against a replayed cassette so they do not
//! depend on the surrounding checkout.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::json;

use branchlog::cassette::recorder::CassetteRecorder;

fn run_branchlog(args: &[&str], replay: Option<&Path>) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_branchlog");
    let mut command = Command::new(bin);
    command.args(args).env_remove("BRANCHLOG_RECORD").env_remove("BRANCHLOG_REPLAY");
    if let Some(path) = replay {
        command.env("BRANCHLOG_REPLAY", path);
    }
    command.output().expect("failed to run branchlog binary")
}

fn cassette(name: &str, outputs: &[serde_json::Value]) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("git.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&path, name, "abc123");
    for output in outputs {
        recorder.record("git", "invoke", json!({"args": []}), output.clone());
    }
    recorder.finish().unwrap()
}

#[test]
fn help_lists_subcommands() {
    let output = run_branchlog(&["--help"], None);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for name in ["branches", "log", "checkout", "reflog", "status"] {
        assert!(stdout.contains(name), "missing {name}");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_branchlog(&["frobnicate"], None);
    assert!(!output.status.success());
}

#[test]
fn branches_from_replayed_listing() {
    let path = cassette("branchlog_cli_branches", &[json!({"ok": ["  dev", "* main"]})]);
    let output = run_branchlog(&["branches"], Some(&path));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(stdout, "  dev\n* main\n");
}

#[test]
fn count_from_replayed_rev_list() {
    let path = cassette("branchlog_cli_count", &[json!({"ok": ["7"]})]);
    let output = run_branchlog(&["count", "main"], Some(&path));
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "7\n");
}

#[test]
fn failed_checkout_exits_nonzero_with_git_stderr() {
    let path = cassette(
        "branchlog_cli_checkout",
        &[json!({"err": {"exit_code": 1, "stderr": "error: pathspec 'nope' did not match"}})],
    );
    let output = run_branchlog(&["checkout", "nope"], Some(&path));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("pathspec 'nope'"));
}

#[test]
fn missing_replay_cassette_is_reported() {
    let path = std::env::temp_dir().join("branchlog_cli_missing.cassette.yaml");
    let output = run_branchlog(&["status"], Some(&path));
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}
