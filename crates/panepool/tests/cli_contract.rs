// CLI contract: argument validation happens before configuration or tmux is
// touched, help succeeds, every failure exits 1.
//
// PANEPOOL_TMUX points at a binary that does not exist, so any test that
// reached tmux would fail with "is not installed" instead of the asserted
// validation message.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MISSING_TMUX: &str = "/nonexistent/panepool-test/tmux";

fn panepool(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_panepool"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("PANEPOOL_TMUX", MISSING_TMUX)
        .env("PANEPOOL_PROJECTS_BASE", home.path().join("projects"))
        .env_remove("TMUX")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_exits_zero() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    panepool(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quick-setup"))
        .stdout(predicate::str::contains("save-outputs"));
}

#[test]
fn subcommand_help_exits_zero() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    panepool(&home)
        .args(["send", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-first"));
}

#[test]
fn unknown_subcommand_exits_one() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    panepool(&home).arg("frobnicate").assert().code(1);
}

#[test]
fn session_names_with_separators_are_rejected_everywhere() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    let cases: &[&[&str]] = &[
        &["create", "foo:bar"],
        &["spawn", "foo:bar", "1", "0"],
        &["add", "foo.bar", "1", "0"],
        &["reconnect", "foo:bar"],
        &["status", "foo:bar"],
        &["view", "foo:bar"],
        &["send", "foo:bar", "ls"],
        &["interrupt", "foo:bar"],
        &["kill", "-f", "foo:bar"],
        &["copy-output", "foo:bar"],
        &["save-outputs", "foo:bar"],
        &["zoom", "foo:bar", "0"],
        &["broadcast", "foo:bar", "all", "hi"],
        &["quick-setup", "foo:bar"],
    ];
    for args in cases {
        panepool(&home)
            .args(*args)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("must not contain"))
            .stderr(predicate::str::contains("is not installed").not());
    }
}

#[test]
fn invalid_pane_counts_are_rejected() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    for count in ["-1", "abc", "0"] {
        panepool(&home)
            .args(["create", "proj", count])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Usage error"))
            .stderr(predicate::str::contains("Usage: panepool create"));
    }
}

#[test]
fn spawn_with_all_zero_counts_has_nothing_to_do() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    panepool(&home)
        .args(["spawn", "proj", "0", "0", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Nothing to do"));
}

#[test]
fn quick_setup_with_all_zero_counts_has_nothing_to_do() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    panepool(&home)
        .args(["quick-setup", "proj", "0", "0", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Nothing to do"));
    assert!(!home.path().join("projects").join("proj").exists());
}

#[test]
fn blank_send_text_is_rejected() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    panepool(&home)
        .args(["send", "proj", "  "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn unknown_broadcast_target_is_rejected() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    panepool(&home)
        .args(["broadcast", "proj", "vim", "hello"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not installed").not());
}

#[test]
fn conflicting_send_filters_exit_one() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    panepool(&home)
        .args(["send", "--cc", "--gmi", "proj", "ls"])
        .assert()
        .code(1);
}

#[test]
fn missing_tmux_is_reported_with_guidance() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    panepool(&home)
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not installed"))
        .stderr(predicate::str::contains("Install"));
}

#[cfg(target_os = "linux")]
#[test]
fn invalid_config_file_is_reported() {
    let home = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
    let dir = home.path().join(".config").join("panepool");
    std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("{e}"));
    std::fs::write(dir.join("config.toml"), "default_panes = 0\n")
        .unwrap_or_else(|e| panic!("{e}"));
    panepool(&home)
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
}
