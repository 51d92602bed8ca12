//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Command for the testhub binary built for this test run.
///
/// Colors are disabled and stdin is empty, so confirmation prompts decline.
pub fn testhub_command(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_testhub"));
    command
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null());
    command
}

/// Run the testhub binary in the specified directory
pub fn run_testhub_in_dir(dir: &Path, args: &[&str]) -> Output {
    testhub_command(dir)
        .args(args)
        .output()
        .expect("Failed to execute testhub binary")
}

/// Run a command that must succeed and return its stdout
pub fn run_ok(dir: &Path, args: &[&str]) -> String {
    let output = run_testhub_in_dir(dir, args);
    assert!(
        output.status.success(),
        "testhub {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Run a command with `--json` that must succeed and parse its stdout
pub fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let stdout = run_ok(dir, &full);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}"))
}

/// Keys of a JSON array of records, in order
pub fn keys(value: &serde_json::Value, field: &str) -> Vec<String> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|record| record[field].as_str().unwrap_or_default().to_string())
        .collect()
}
