use assert_cmd::Command;
use std::path::PathBuf;

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Copy the built binary under another name, the way a multi-call install
/// links it.
fn alias(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let target = dir
        .path()
        .join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
    std::fs::copy(assert_cmd::cargo::cargo_bin("busyrs"), &target).unwrap();
    target
}

#[test]
fn base_name_prints_usage_and_succeeds() {
    let assert = Command::cargo_bin("busyrs").unwrap().assert().success();
    let out = stdout_of(assert.get_output());
    assert!(out.starts_with("Usage of busyrs:"));
    assert!(out.contains("package \"path/filepath\""));
}

#[cfg(unix)]
#[test]
fn selector_invokes_function() {
    let assert = Command::cargo_bin("busyrs")
        .unwrap()
        .args(["-f", "filepath.Clean", "/a/./b/../c"])
        .assert()
        .success();
    assert_eq!(stdout_of(assert.get_output()), "/a/c\n");
}

#[cfg(unix)]
#[test]
fn alias_name_selects_function() {
    let dir = tempfile::tempdir().unwrap();
    let join = alias(&dir, "join");
    let assert = Command::new(join)
        .args(["a", "b", "../c"])
        .assert()
        .success();
    assert_eq!(stdout_of(assert.get_output()), "a/c\n");
    assert_eq!(stderr_of(assert.get_output()), "");
}

#[test]
fn alias_help_prints_function_usage() {
    let dir = tempfile::tempdir().unwrap();
    let base = alias(&dir, "base");
    let assert = Command::new(base).arg("--help").assert().success();
    assert_eq!(
        stdout_of(assert.get_output()),
        "Usage of (\"path/filepath\") base:\n\tbase path [...]\n\t\treturns: string\n"
    );
}

#[test]
fn unknown_alias_prints_usage_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let nosuch = alias(&dir, "nosuch");
    let assert = Command::new(nosuch).arg("x").assert().success();
    assert!(stdout_of(assert.get_output()).starts_with("Usage of nosuch:"));
}

#[test]
fn function_error_goes_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let rel = alias(&dir, "rel");
    let assert = Command::new(rel).arg("only").assert().code(1);
    assert_eq!(stdout_of(assert.get_output()), "");
    assert_eq!(
        stderr_of(assert.get_output()),
        "Rel: expected 2 argument(s), got 1\n"
    );
}
