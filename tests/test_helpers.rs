#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// Points at a port nothing listens on, so no test reaches a real model.
pub const UNREACHABLE_OLLAMA_URL: &str = "http://127.0.0.1:9";

/// Creates a `Command` for the `mindtalk` binary with a clean, non-interactive
/// environment and its database at `db_path`.
pub fn mindtalk_command(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mindtalk").expect("mindtalk binary not built");
    configure_mindtalk_command(&mut cmd, db_path);
    cmd
}

/// Applies the standard test environment to an existing `Command`.
pub fn configure_mindtalk_command(cmd: &mut Command, db_path: &Path) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("MINDTALK_DB", db_path)
        .env("MINDTALK_OLLAMA_URL", UNREACHABLE_OLLAMA_URL)
        .env("MINDTALK_GENERATION_TIMEOUT_SECS", "2")
        .env("RUST_LOG", "warn");
}
