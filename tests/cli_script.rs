use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

use ledgerdesk::cli::SCRIPT_ENV;

fn ledgerdesk(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ledgerdesk").unwrap();
    cmd.env(SCRIPT_ENV, "1")
        .env("LEDGERDESK_HOME", home.path())
        // Nothing listens here; commands that reach the API fail fast.
        .env("LEDGERDESK_API_URL", "http://127.0.0.1:9")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_the_command_groups() {
    let home = TempDir::new().unwrap();
    ledgerdesk(&home)
        .write_stdin("help\nexit\n")
        .assert()
        .success()
        .stdout(contains("voucher"))
        .stdout(contains("series"))
        .stdout(contains("requisition"));
}

#[test]
fn version_reports_the_package_version() {
    let home = TempDir::new().unwrap();
    let output = ledgerdesk(&home).write_stdin("version\n").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let pattern = Regex::new(r"LedgerDesk \d+\.\d+\.\d+").unwrap();
    assert!(pattern.is_match(&stdout), "unexpected version output: {stdout}");
    assert!(stdout.contains("signed out"));
}

#[test]
fn signed_out_commands_explain_how_to_sign_in() {
    let home = TempDir::new().unwrap();
    ledgerdesk(&home)
        .write_stdin("whoami\nvoucher list\n")
        .assert()
        .success()
        .stdout(contains("Not signed in").count(2))
        .stdout(contains("login you@example.com"));
}

#[test]
fn config_set_is_written_to_the_home_directory() {
    let home = TempDir::new().unwrap();
    ledgerdesk(&home)
        .write_stdin("config set currency eur\nconfig show\n")
        .assert()
        .success()
        .stdout(contains("currency updated"))
        .stdout(contains("EUR"));

    let stored = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(stored.contains("\"EUR\""));
    // Environment overrides are never persisted.
    assert!(!stored.contains("127.0.0.1"));
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let home = TempDir::new().unwrap();
    ledgerdesk(&home)
        .write_stdin("# setup\n\nlogout\n")
        .assert()
        .success()
        .stdout(contains("Unknown command").not());
}
