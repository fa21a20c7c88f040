//! Integration tests for CLI argument handling
//!
//! Runs the built binary with various flags and scripted stdin.

use std::io::{ErrorKind, Write};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Helper to run the CLI with given args and stdin, capturing output
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_parkfinder"))
        .args(args)
        .env_remove("PARKFINDER_CACHE_FILE")
        .env_remove("PARKFINDER_CATALOG_URL")
        .env_remove("PARKFINDER_SEARCH_URL")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute parkfinder");

    // The child may exit before reading its input (e.g. on a bad argument)
    let written = child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes());
    if let Err(e) = written {
        assert_eq!(e.kind(), ErrorKind::BrokenPipe, "Failed to write stdin: {}", e);
    }
    child.wait_with_output().expect("Failed to wait for parkfinder")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"], "");
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("parkfinder"), "Help should mention parkfinder");
    assert!(stdout.contains("--cache-file"), "Help should mention --cache-file");
    assert!(stdout.contains("--defer-cache-writes"));
}

#[test]
fn test_invalid_catalog_url_prints_error_and_exits() {
    let temp_dir = TempDir::new().unwrap();
    let cache_file = temp_dir.path().join("cache.json");
    let output = run_cli(
        &[
            "--cache-file",
            cache_file.to_str().unwrap(),
            "--catalog-url",
            "not a url",
        ],
        "exit\n",
    );
    assert!(!output.status.success(), "Expected invalid URL to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid --catalog-url"),
        "Should print error message about the catalog URL: {}",
        stderr
    );
}

#[test]
fn test_exit_at_first_prompt_needs_no_network() {
    let temp_dir = TempDir::new().unwrap();
    let cache_file = temp_dir.path().join("cache.json");
    let output = run_cli(
        &[
            "--cache-file",
            cache_file.to_str().unwrap(),
            "--catalog-url",
            "http://127.0.0.1:9/index.htm",
        ],
        "exit\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Enter a state name (e.g. Michigan, michigan) or 'exit':"));
    assert!(!cache_file.exists(), "Nothing was fetched, so nothing is saved");
}

#[test]
fn test_unreachable_catalog_fails_the_session() {
    let temp_dir = TempDir::new().unwrap();
    let cache_file = temp_dir.path().join("cache.json");
    let output = run_cli(
        &[
            "--cache-file",
            cache_file.to_str().unwrap(),
            "--catalog-url",
            "http://127.0.0.1:9/index.htm",
        ],
        "michigan\n",
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parkfinder stopped"), "stderr: {}", stderr);
}
