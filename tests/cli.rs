use assert_cmd::Command;
use std::path::PathBuf;

fn scratch_home(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("addon-manager-cli-{}-{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn addon_manager(home: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("addon-manager").unwrap();
    cmd.env("HOME", home)
        .env_remove("STREMIO_AUTH_KEY")
        // Nothing listens here, so any accidental request fails fast.
        .env("STREMIO_API_URL", "http://127.0.0.1:1/api/")
        .env("ADDON_MANAGER_TIMEOUT_SECS", "2");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let home = scratch_home("help");
    let output = addon_manager(&home).arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["list", "move", "remove", "edit", "rename-catalog", "manage", "login", "logout"] {
        assert!(stdout.contains(sub), "missing `{}` in help:\n{}", sub, stdout);
    }
}

#[test]
fn version_prints_signature() {
    let home = scratch_home("version");
    let output = addon_manager(&home).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Addon Manager"));
}

#[test]
fn list_without_auth_key_fails_before_any_request() {
    let home = scratch_home("noauth");
    let output = addon_manager(&home).arg("list").output().unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("auth key not found"), "stdout was:\n{}", stdout);
    assert!(!stdout.contains("Failed to reach"));
}

#[test]
fn malformed_config_is_reported_with_its_cause() {
    let home = scratch_home("badcfg");
    let app_dir = home.join(".addon-manager");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(app_dir.join("config.json"), "{ authKey: oops").unwrap();

    let output = addon_manager(&home).arg("list").output().unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed to parse config file"), "stdout was:\n{}", stdout);
    assert!(stdout.contains("auth key not found"), "stdout was:\n{}", stdout);
}

#[test]
fn unreachable_api_is_reported_as_network_failure() {
    let home = scratch_home("offline");
    let output = addon_manager(&home)
        .env("STREMIO_AUTH_KEY", "some-key")
        .args(["move", "0", "1"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed to reach the collection API"), "stdout was:\n{}", stdout);
}

#[test]
fn login_then_logout_round_trips_the_config_file() {
    let home = scratch_home("login");
    let config = home.join(".addon-manager").join("config.json");

    let output = addon_manager(&home).args(["login", "abc123"]).output().unwrap();
    assert!(output.status.success());
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(saved["authKey"], "abc123");

    let output = addon_manager(&home).arg("logout").output().unwrap();
    assert!(output.status.success());
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    assert!(saved.get("authKey").is_none());

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn move_requires_both_indices() {
    let home = scratch_home("args");
    let output = addon_manager(&home).args(["move", "0"]).output().unwrap();
    assert!(!output.status.success());
}
