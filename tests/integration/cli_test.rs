//! Tests of the compiled binary's exit behavior.
//!
//! None of these reach a database.

use std::process::{Command, Stdio};

fn pg2xlsx() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pg2xlsx"));
    cmd.env("PG2XLSX_CONFIG", "/nonexistent/pg2xlsx/config.toml")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null());
    cmd
}

#[test]
fn test_version() {
    let output = pg2xlsx().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "{stdout}");
}

#[test]
fn test_missing_output_fails_before_connecting() {
    let output = pg2xlsx()
        .args(["-c", "SELECT 1", "-H", "nonexistent.invalid.host"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("You must specify an output file name"), "{stderr}");
}

#[test]
fn test_unreadable_query_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.xlsx");

    let output = pg2xlsx()
        .args(["-w", "-f", "/nonexistent/query.sql", "-o"])
        .arg(&out)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Input error"), "{stderr}");
    assert!(!out.exists());
}
