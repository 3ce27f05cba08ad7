//! CLI integration tests
//!
//! Runs the servicegen binary against temporary monorepos and checks exit
//! codes and `--plan` output.

mod support;

use std::process::Command;
use support::Monorepo;

fn servicegen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_servicegen"));
    cmd.env_remove("RUST_LOG")
        .env_remove("SERVICEGEN_BUNDLER")
        .env_remove("SERVICEGEN_LOG_LEVEL");
    cmd
}

#[test]
fn test_cli_help() {
    let output = servicegen().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run"));
}

#[test]
fn test_plan_prints_configurations() {
    let repo = Monorepo::new();
    repo.add("packages", "universal-foo", "1.2.3", true);
    repo.add("packages", "rax-cli", "1.0.0", true);

    let output = servicegen()
        .args(["-q", "run", "--plan"])
        .arg(repo.root())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["configs"].as_array().unwrap().len(), 1);
    assert_eq!(plan["configs"][0]["identity"], "universal_foo_1_2_3");
    assert_eq!(plan["skipped"][0]["package"], "rax-cli");
    assert_eq!(plan["skipped"][0]["reason"], "excluded");
}

#[test]
fn test_missing_project_root_exit_code() {
    let output = servicegen()
        .args(["-q", "run", "/nonexistent/servicegen/monorepo"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_log_level_flag_is_validated() {
    let repo = Monorepo::new();

    let invalid = servicegen()
        .args(["--log-level", "bogus", "run", "--plan"])
        .arg(repo.root())
        .output()
        .unwrap();
    assert_eq!(invalid.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&invalid.stderr).contains("Invalid log level: bogus"));

    let overridden = servicegen()
        .env("SERVICEGEN_LOG_LEVEL", "verbose")
        .args(["--log-level", "error", "run", "--plan"])
        .arg(repo.root())
        .output()
        .unwrap();
    assert_eq!(overridden.status.code(), Some(0));
}

#[cfg(unix)]
#[test]
fn test_failing_bundler_exit_code() {
    let repo = Monorepo::new();
    repo.add("packages", "universal-foo", "1.2.3", true);

    let output = servicegen()
        .args(["-q", "run", "--bundler", "false", "--no-color"])
        .arg(repo.root())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("universal-foo"));
}

#[cfg(unix)]
#[test]
fn test_successful_bundler_exit_code() {
    let repo = Monorepo::new();
    repo.add("packages", "universal-foo", "1.2.3", true);

    let output = servicegen()
        .args(["-q", "run", "--bundler", "true"])
        .arg(repo.root())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
}
