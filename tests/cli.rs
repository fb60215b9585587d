//! Binary-level tests for the rebrand CLI.
//!
//! These spawn the real binary and verify argument handling, output, and
//! exit behavior. Nothing here touches the network.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn rebrand() -> Command {
    Command::cargo_bin("rebrand").unwrap()
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn help_lists_subcommands() {
    rebrand()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("migrate")
                .and(predicate::str::contains("apply"))
                .and(predicate::str::contains("completion")),
        );
}

#[test]
fn migrate_help_shows_workflow_examples() {
    rebrand()
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("WORKFLOW EXAMPLES")
                .and(predicate::str::contains("--reprocess")),
        );
}

#[test]
fn version_prints_name() {
    rebrand()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rebrand"));
}

// =============================================================================
// apply
// =============================================================================

#[test]
fn apply_renames_and_rewrites_a_tree() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("tools.md").write_str("all the tools").unwrap();
    temp.child("docs/tools/entry.txt")
        .write_str("tools inside")
        .unwrap();

    rebrand()
        .args(["apply", "--find", "tools", "--replace", "agents"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied:"));

    temp.child("agents.md").assert("all the agents");
    temp.child("docs/agents/entry.txt").assert("agents inside");
    temp.child("tools.md").assert(predicate::path::missing());
}

#[test]
fn apply_defaults_to_current_directory() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("tools.txt").write_str("tools").unwrap();

    rebrand()
        .args(["apply", "--find", "tools", "--replace", "agents"])
        .current_dir(temp.path())
        .assert()
        .success();

    temp.child("agents.txt").assert("agents");
}

#[test]
fn apply_quiet_suppresses_output() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("tools.txt").write_str("tools").unwrap();

    rebrand()
        .args(["--quiet", "apply", "--find", "tools", "--replace", "agents"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn apply_rejects_invalid_pattern() {
    let temp = assert_fs::TempDir::new().unwrap();

    rebrand()
        .args(["apply", "--find", "[unclosed", "--replace", "x"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern"));
}

// =============================================================================
// migrate
// =============================================================================

#[test]
fn migrate_without_token_fails_before_any_work() {
    let temp = assert_fs::TempDir::new().unwrap();

    // Point every config lookup at the empty temp dir so neither the
    // environment nor an ambient rebrand.toml can supply a token.
    rebrand()
        .arg("migrate")
        .current_dir(temp.path())
        .env_remove("GITHUB_PERSONAL_TOKEN")
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no access token configured"));
}

#[test]
fn migrate_reports_malformed_config_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("rebrand.toml")
        .write_str("not_a_known_key = true\n")
        .unwrap();

    rebrand()
        .arg("migrate")
        .current_dir(temp.path())
        .env_remove("GITHUB_PERSONAL_TOKEN")
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

// =============================================================================
// completion
// =============================================================================

#[test]
fn completion_emits_bash_script() {
    rebrand()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rebrand"));
}

#[test]
fn completion_rejects_unknown_shell() {
    rebrand()
        .args(["completion", "tcsh"])
        .assert()
        .failure();
}
