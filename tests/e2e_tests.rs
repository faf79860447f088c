//! End-to-end tests for the depclimb CLI
//!
//! These tests verify:
//! - Argument validation and help output
//! - Exit codes for precondition failures
//! - Output formats for runs with nothing to do
//!
//! None of these tests touch the network: they use declaration files with
//! no upgradeable entries, so the run ends before any index query.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn depclimb() -> Command {
    Command::cargo_bin("depclimb").expect("Failed to find binary")
}

fn git(dir: &Path, args: &[&str]) {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// A clean git repository whose declaration file holds only comments
fn create_empty_project() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let dir = temp_dir.path();
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "test"]);
    fs::write(dir.join("depends.cfg"), "# nothing declared yet\n").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-qm", "initial"]);
    temp_dir
}

mod argument_tests {
    use super::*;

    #[test]
    fn test_help_describes_the_tool() {
        depclimb()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("test command"));
    }

    #[test]
    fn test_version_flag() {
        depclimb()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("depclimb"));
    }

    #[test]
    fn test_test_command_is_required() {
        depclimb()
            .assert()
            .failure()
            .stderr(predicate::str::contains("TEST_COMMAND"));
    }
}

mod precondition_tests {
    use super::*;

    #[test]
    fn test_missing_declaration_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();

        depclimb()
            .args(["true", "--path"])
            .arg(temp_dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("declaration file not found"));
    }

    #[test]
    fn test_missing_repository_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("depends.cfg"), "# empty\n").unwrap();

        depclimb()
            .args(["true", "--path"])
            .arg(temp_dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn test_dirty_repository_fails() {
        let temp_dir = create_empty_project();
        fs::write(
            temp_dir.path().join("depends.cfg"),
            "# edited but not committed\n",
        )
        .unwrap();

        depclimb()
            .args(["true", "--path"])
            .arg(temp_dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("not clean"));
    }
}

mod empty_run_tests {
    use super::*;

    #[test]
    fn test_nothing_to_upgrade_exits_zero() {
        let temp_dir = create_empty_project();

        depclimb()
            .args(["true", "--path"])
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("0 upgraded, 0 failed, 0 skipped"));
    }

    #[test]
    fn test_json_output_is_parseable() {
        let temp_dir = create_empty_project();

        let output = depclimb()
            .args(["true", "--json", "--path"])
            .arg(temp_dir.path())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let value: serde_json::Value =
            serde_json::from_slice(&output).expect("stdout should be valid JSON");
        assert_eq!(value["dry_run"], false);
        assert_eq!(value["summary"]["full_successes"], 0);
    }

    #[test]
    fn test_tox_without_recreate_warns() {
        let temp_dir = create_empty_project();

        depclimb()
            .args(["tox -e py311", "--path"])
            .arg(temp_dir.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("--recreate"));
    }

    #[test]
    fn test_quiet_suppresses_the_warning() {
        let temp_dir = create_empty_project();

        depclimb()
            .args(["tox -e py311", "--quiet", "--path"])
            .arg(temp_dir.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("--recreate").not());
    }
}
