//! CLI smoke tests: basic binary behavior.

use std::io::Write;
use std::process::{Command, Stdio};

fn cli_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_kudos"))
}

#[test]
fn test_help_flag() {
    let output = cli_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "Expected usage info in --help output");
    assert!(stdout.contains("--no-animations"));
}

#[test]
fn test_version_flag() {
    let output = cli_bin().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kudos"), "Expected binary name in --version output");
}

#[test]
fn test_scripted_session() {
    let mut child = cli_bin()
        .arg("--config")
        .arg("/tmp/nonexistent_kudos_config_12345.toml")
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to run");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"event goal_reached\nunlock first_login\nunlock first_login\nstate\nquit\n")
        .expect("write stdin");

    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("motivated -> fx-1 confetti"));
    assert!(stdout.contains("unlocked first_login (+10 points)"));
    assert!(stdout.contains("first_login not newly unlocked"));
    assert!(stdout.contains("\"mood\": \"happy\""));
}

#[test]
fn test_no_animations_flag() {
    let mut child = cli_bin()
        .arg("--no-animations")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to run");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"event post_liked\nlist\nstats\n")
        .expect("write stdin");

    // EOF ends the session like `quit`.
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("animations off"));
    assert!(stdout.contains("[]"));
    assert!(stdout.contains("\"suppressed\":1"));
}
