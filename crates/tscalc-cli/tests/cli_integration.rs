//! End-to-end tests driving the `tscalc` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn tscalc_binary() -> String {
    env!("CARGO_BIN_EXE_tscalc").to_string()
}

/// A command isolated from the caller's environment and config.
fn tscalc(home: &Path) -> Command {
    let mut cmd = Command::new(tscalc_binary());
    cmd.env_clear().env("HOME", home).stdin(Stdio::null());
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run tscalc");
    {
        let stdin = child.stdin.as_mut().unwrap();
        stdin.write_all(input.as_bytes()).unwrap();
    }
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_evaluates_arguments() {
    let temp = TempDir::new().unwrap();
    let output = tscalc(temp.path())
        .env("TSCALC_NOW", "1970-01-01T00:00:00Z")
        .args(["--", "100", "1m + 1s", "-4h + now - now + 1h"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "1970-01-01T00:01:40+00:00\n1m1s\n-3h\n"
    );
}

#[test]
fn test_reads_lines_from_stdin() {
    let temp = TempDir::new().unwrap();
    let mut cmd = tscalc(temp.path());
    cmd.args(["--now", "1970-01-01T00:00:00Z"]);
    let output = run_with_stdin(cmd, "now - 1h\n\n1970-01-01T00:01:40+00:00\n");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "1969-12-31T23:00:00+00:00\n100.000000\n"
    );
}

#[test]
fn test_failed_line_sets_exit_status() {
    let temp = TempDir::new().unwrap();
    let output = run_with_stdin(tscalc(temp.path()), "100 garbage\n1s + 1s\n");

    assert!(!output.status.success());
    assert_eq!(stdout(&output), "2s\n");
    assert_eq!(
        stderr(&output),
        "error: failed to parse whole input, the remainder: \" garbage\"\n100 garbage\n   ^\n"
    );
}

#[test]
fn test_fail_fast_stops_reading() {
    let temp = TempDir::new().unwrap();
    let mut cmd = tscalc(temp.path());
    cmd.arg("--fail-fast");
    let output = run_with_stdin(cmd, "1s\nbogus\n2s\n");

    assert!(!output.status.success());
    assert_eq!(stdout(&output), "1s\n");
}

#[test]
fn test_json_output() {
    let temp = TempDir::new().unwrap();
    let output = tscalc(temp.path())
        .args(["--json", "--now", "1970-01-01T00:00:00Z", "now", "1h - now"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let lines: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["result"], "1970-01-01T00:00:00+00:00");
    assert_eq!(lines[0]["kind"], "iso time");
    assert_eq!(lines[1]["error"], "cannot combine period - iso time");
    assert_eq!(lines[1]["column"], 5);
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_config_file_sets_defaults() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.path().join("config.toml");
    std::fs::write(
        &config_file,
        "json = true\nnow = \"1970-01-01T00:01:40Z\"\n",
    )
    .unwrap();

    let output = tscalc(temp.path())
        .arg("--config")
        .arg(&config_file)
        .arg("now")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "{\"input\":\"now\",\"result\":\"1970-01-01T00:01:40+00:00\",\"kind\":\"iso time\"}\n"
    );
}

#[test]
fn test_now_flag_overrides_config() {
    let temp = TempDir::new().unwrap();
    let output = tscalc(temp.path())
        .env("TSCALC_NOW", "2000-01-01T00:00:00Z")
        .args(["--now", "1970-01-01T00:00:00Z", "now"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "1970-01-01T00:00:00+00:00\n");
}

#[cfg(target_os = "linux")]
#[test]
fn test_default_config_location() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join(".config/tscalc");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "now = \"1970-01-01T00:00:00Z\"\n",
    )
    .unwrap();

    let output = tscalc(temp.path()).arg("now + 1h").output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "1970-01-01T01:00:00+00:00\n");
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.path().join("config.toml");
    std::fs::write(&config_file, "now = \"not a time\"\n").unwrap();

    let output = tscalc(temp.path())
        .arg("--config")
        .arg(&config_file)
        .arg("1s")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("failed to load configuration"),
        "stderr: {}",
        stderr(&output)
    );
}
