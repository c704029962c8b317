//! End-to-end tests for the umeng-push binary

mod common;

use common::{TestEnvironment, APP_KEY, APP_MASTER_SECRET};
use predicates::prelude::*;
use std::fs;
use umeng_push::signer;

#[test]
fn test_help_lists_commands() {
    let env = TestEnvironment::new();
    env.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("sign"));
}

#[test]
fn test_version() {
    let env = TestEnvironment::new();
    env.command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_init_project_config() {
    let env = TestEnvironment::new();
    let config_path = env.project_path().join(".umeng-push").join("config.toml");

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized successfully"));
    assert!(config_path.exists());
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("http://msg.umeng.com"));

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));

    env.command()
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized successfully"));
}

#[test]
fn test_config_set_get_show() {
    let env = TestEnvironment::new();

    env.command()
        .args(["config", "set", "umeng.app_key", APP_KEY])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Configuration updated: umeng.app_key = {APP_KEY}")));
    env.command()
        .args(["config", "set", "umeng.app_master_secret", APP_MASTER_SECRET])
        .assert()
        .success();

    env.command()
        .args(["config", "get", "umeng.app_key"])
        .assert()
        .success()
        .stdout(predicate::str::contains(APP_KEY));

    env.command()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains(APP_MASTER_SECRET).not());
}

#[test]
fn test_config_rejects_bad_values() {
    let env = TestEnvironment::new();

    env.command()
        .args(["config", "set", "umeng.timeout_secs", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("umeng.timeout_secs"));

    env.command()
        .args(["config", "get", "umeng.unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_send_android_dry_run() {
    let env = TestEnvironment::new();

    env.command()
        .args([
            "send",
            "android",
            "--app-key",
            APP_KEY,
            "--app-master-secret",
            APP_MASTER_SECRET,
            "--alias-type",
            "grp",
            "--alias",
            "123",
            "--display-type",
            "message",
            "--custom",
            r#"{"k":"v"}"#,
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run - would send android notification"))
        .stdout(predicate::str::contains("URL: http://msg.umeng.com/api/send?sign="))
        .stdout(predicate::str::contains(r#""type":"customizedcast""#))
        .stdout(predicate::str::contains(format!(r#""appkey":"{APP_KEY}""#)))
        .stdout(predicate::str::contains(APP_MASTER_SECRET).not());
}

#[test]
fn test_send_android_signature_matches_body() {
    let env = TestEnvironment::new();

    let output = env
        .command()
        .env("UMENG_APP_KEY", APP_KEY)
        .env("UMENG_APP_MASTER_SECRET", APP_MASTER_SECRET)
        .args([
            "send", "android", "--alias-type", "grp", "--alias", "123", "--ticker", "t", "--title",
            "Hi", "--text", "Hello", "--dry-run",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let url = stdout
        .lines()
        .find_map(|line| line.strip_prefix("URL: "))
        .expect("URL line");
    let body = stdout
        .lines()
        .find_map(|line| line.strip_prefix("Body: "))
        .expect("Body line");

    let (base, sign) = url.split_once("?sign=").unwrap();
    assert_eq!(sign, signer::sign("POST", base, body, APP_MASTER_SECRET));
}

#[test]
fn test_send_ios_dry_run_uses_config_credentials() {
    let env = TestEnvironment::new();
    env.command()
        .args(["config", "set", "umeng.app_key", APP_KEY])
        .assert()
        .success();
    env.command()
        .args(["config", "set", "umeng.app_master_secret", APP_MASTER_SECRET])
        .assert()
        .success();

    env.command()
        .args([
            "send",
            "ios",
            "--alias-type",
            "uid",
            "--alias",
            "30000372",
            "--alert",
            "You got a new red packet",
            "--field",
            "url=app://wallet",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run - would send ios notification"))
        .stdout(predicate::str::contains(r#""aps":{"alert":"You got a new red packet"}"#))
        .stdout(predicate::str::contains(r#""url":"app://wallet""#));
}

#[test]
fn test_send_validation_failure() {
    let env = TestEnvironment::new();

    env.command()
        .args([
            "send",
            "android",
            "--app-key",
            APP_KEY,
            "--app-master-secret",
            APP_MASTER_SECRET,
            "--alias-type",
            "grp",
            "--alias",
            "123",
            "--display-type",
            "banner",
            "--dry-run",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Display type banner unsupported!"));

    env.command()
        .args([
            "send",
            "android",
            "--app-key",
            APP_KEY,
            "--app-master-secret",
            APP_MASTER_SECRET,
            "--alias-type",
            "grp",
            "--display-type",
            "message",
            "--custom",
            "x",
            "--dry-run",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "You need to set alias or upload file for customizedcast!",
        ));
}

#[test]
fn test_send_without_credentials() {
    let env = TestEnvironment::new();

    env.command()
        .args(["send", "android", "--alias-type", "grp", "--alias", "123", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No app key"));
}

#[test]
fn test_sign_command() {
    let env = TestEnvironment::new();
    let url = "http://msg.umeng.com/api/send";
    let body = r#"{"appkey":"K"}"#;
    let expected = signer::sign("POST", url, body, "S");

    env.command()
        .args(["sign", "--url", url, "--body", body, "--secret", "S"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.clone()))
        .stdout(predicate::str::contains(format!("{url}?sign={expected}")));
}

#[test]
fn test_upload_missing_file() {
    let env = TestEnvironment::new();

    env.command()
        .args(["upload", "--app-key", APP_KEY, "--app-master-secret", APP_MASTER_SECRET])
        .arg(env.project_path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
