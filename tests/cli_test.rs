//! End-to-end CLI tests run against the compiled binary.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::logger::TestLogger;

const CONFIG: &str = r#"
[[customers]]
name = "Acme"
billing-id = "ACME-001"
ticketing-org = "acme"

[billing-provider]
server = "https://bi.example.com"
site = "corp"
api-version = "3.19"
token-name = "briefing-bot"

[ticketing-provider]
subdomain = "example"
email = "bot@example.com"

[rpc-agent]
url = "http://finance-agent.internal:8080/rpc"
"#;

fn write_config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("abrief.toml");
    std::fs::write(&path, CONFIG).expect("write config");
    path
}

#[test]
fn missing_config_exits_with_config_error() {
    let log = TestLogger::new("missing_config_exits_with_config_error");
    log.phase("execute");

    Command::cargo_bin("abrief")
        .expect("binary")
        .args(["--config", "/nonexistent/abrief.toml", "--dry-run"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ABR-C001"));

    log.finish_ok();
}

#[test]
fn invalid_config_exits_with_config_error() {
    let log = TestLogger::new("invalid_config_exits_with_config_error");
    log.phase("setup");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("abrief.toml");
    std::fs::write(&path, "customers = not-toml").expect("write config");

    log.phase("execute");
    Command::cargo_bin("abrief")
        .expect("binary")
        .args(["--config", path.to_str().expect("utf8"), "--dry-run"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ABR-C002"));

    log.finish_ok();
}

#[test]
fn dry_run_prints_the_plan_without_network() {
    let log = TestLogger::new("dry_run_prints_the_plan_without_network");
    log.phase("setup");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir);

    log.phase("execute");
    Command::cargo_bin("abrief")
        .expect("binary")
        .args(["--config", path.to_str().expect("utf8"), "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("Account: Acme (ACME-001)"))
        .stdout(predicate::str::contains("type:ticket organization:acme"));

    log.finish_ok();
}

#[test]
fn unknown_account_filter_is_a_config_error() {
    let log = TestLogger::new("unknown_account_filter_is_a_config_error");
    log.phase("setup");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir);

    log.phase("execute");
    Command::cargo_bin("abrief")
        .expect("binary")
        .args([
            "--config",
            path.to_str().expect("utf8"),
            "--account",
            "Initech",
            "--dry-run",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Initech"));

    log.finish_ok();
}

#[test]
fn zero_lookback_is_rejected_before_loading_config() {
    let log = TestLogger::new("zero_lookback_is_rejected_before_loading_config");
    log.phase("execute");

    Command::cargo_bin("abrief")
        .expect("binary")
        .args(["--lookback-days", "0", "--dry-run"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("lookback-days"));

    log.finish_ok();
}

#[test]
fn help_describes_the_tool() {
    let log = TestLogger::new("help_describes_the_tool");
    log.phase("execute");

    Command::cargo_bin("abrief")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--section"));

    log.finish_ok();
}
