//! Runs the built binary against temporary directories

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run(root: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_statefulchat"))
        .arg("--config-dir")
        .arg(root.join("config"))
        .arg("--storage-dir")
        .arg(root.join("conversations"))
        .args(args)
        .env("STATEFULCHAT__LOGGING__DIR", root.join("diagnostics"))
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start statefulchat");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_list_empty_storage() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["list"], "");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No saved conversations"));
}

#[test]
fn test_chat_exit_then_end_of_input() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["--plain"], "exit\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("New conversation"));
    assert!(stdout.contains("Saved conversations"));
    assert!(stdout.trim_end().ends_with("Goodbye!"));

    let records: Vec<_> = std::fs::read_dir(temp_dir.path().join("conversations"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("conversation_") && name.ends_with(".json"))
        .collect();
    assert_eq!(records.len(), 1);

    let listed = run(temp_dir.path(), &["list"], "");
    let stdout = String::from_utf8_lossy(&listed.stdout);
    assert!(stdout.contains("1. untitled"));
}
