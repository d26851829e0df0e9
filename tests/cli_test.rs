//! Command-line tests running the compiled binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("follow-audit").unwrap();
    cmd.env_remove("RUST_LOG").env("LOG_LEVEL", "ERROR");
    cmd
}

fn basic_exports(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let followers = common::write_export(
        dir.path(),
        "followers_1.json",
        &common::followers_json(&["alice", "carol"]),
    )
    .unwrap();
    let following = common::write_export(
        dir.path(),
        "following.json",
        &common::following_json(&["carol", "bob", "alice", "dave"]),
    )
    .unwrap();
    (followers, following)
}

#[test]
fn test_analyze_plain_output() {
    let dir = TempDir::new().unwrap();
    let (followers, following) = basic_exports(&dir);

    cli()
        .arg("analyze")
        .arg("--followers")
        .arg(&followers)
        .arg("--following")
        .arg(&following)
        .args(["--format", "plain"])
        .assert()
        .success()
        .stdout("bob\ndave\n");
}

#[test]
fn test_analyze_text_output_lists_usernames() {
    let dir = TempDir::new().unwrap();
    let (followers, following) = basic_exports(&dir);

    cli()
        .arg("analyze")
        .arg("--followers")
        .arg(&followers)
        .arg("--following")
        .arg(&following)
        .assert()
        .success()
        .stdout(predicate::str::contains("not following back"))
        .stdout(predicate::str::contains("bob\ndave\n"));
}

#[test]
fn test_analyze_json_output() {
    let dir = TempDir::new().unwrap();
    let (followers, following) = basic_exports(&dir);

    let output = cli()
        .arg("analyze")
        .arg("--followers")
        .arg(&followers)
        .arg("--following")
        .arg(&following)
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["followers"], 2);
    assert_eq!(value["following"], 4);
    assert_eq!(value["notFollowingBack"]["usernames"], serde_json::json!(["bob", "dave"]));
}

#[test]
fn test_invalid_export_is_rejected_with_message() {
    let dir = TempDir::new().unwrap();
    let followers = common::write_export(dir.path(), "followers_1.json", "{not json").unwrap();
    let following =
        common::write_export(dir.path(), "following.json", &common::following_json(&["bob"]))
            .unwrap();

    cli()
        .arg("analyze")
        .arg("--followers")
        .arg(&followers)
        .arg("--following")
        .arg(&following)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("followers export is not valid JSON"));
}

#[test]
fn test_invalid_export_json_error() {
    let dir = TempDir::new().unwrap();
    let followers =
        common::write_export(dir.path(), "followers_1.json", &common::followers_json(&["a"]))
            .unwrap();
    let following = common::write_export(dir.path(), "following.json", "[]").unwrap();

    cli()
        .arg("analyze")
        .arg("--followers")
        .arg(&followers)
        .arg("--following")
        .arg(&following)
        .args(["--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\""))
        .stdout(predicate::str::contains("invalid structure"));
}

#[test]
fn test_skip_validation_degrades_gracefully() {
    let dir = TempDir::new().unwrap();
    let followers = common::write_export(dir.path(), "followers_1.json", "{not json").unwrap();
    let following = common::write_export(
        dir.path(),
        "following.json",
        &common::following_json(&["zed", "amy"]),
    )
    .unwrap();

    cli()
        .arg("analyze")
        .arg("--followers")
        .arg(&followers)
        .arg("--following")
        .arg(&following)
        .args(["--format", "plain", "--skip-validation"])
        .assert()
        .success()
        .stdout("amy\nzed\n");
}

#[test]
fn test_wrong_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (_, following) = basic_exports(&dir);
    let followers = common::write_export(dir.path(), "followers.txt", "[]").unwrap();

    cli()
        .arg("analyze")
        .arg("--followers")
        .arg(&followers)
        .arg("--following")
        .arg(&following)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be in .json format"));
}

#[test]
fn test_export_dir_merges_split_followers() {
    let dir = TempDir::new().unwrap();
    let nested = "connections/followers_and_following";
    common::write_export(
        dir.path(),
        &format!("{}/followers_1.json", nested),
        &common::followers_json(&["alice"]),
    )
    .unwrap();
    common::write_export(
        dir.path(),
        &format!("{}/followers_2.json", nested),
        &common::followers_json(&["bob"]),
    )
    .unwrap();
    common::write_export(
        dir.path(),
        &format!("{}/following.json", nested),
        &common::following_json(&["alice", "bob", "carol"]),
    )
    .unwrap();

    cli()
        .arg("analyze")
        .arg("--export-dir")
        .arg(dir.path())
        .args(["--format", "plain"])
        .assert()
        .success()
        .stdout("carol\n");
}

#[test]
fn test_save_writes_result_file() {
    let dir = TempDir::new().unwrap();
    let (followers, following) = basic_exports(&dir);
    let out_dir = dir.path().join("results");

    cli()
        .arg("analyze")
        .arg("--followers")
        .arg(&followers)
        .arg("--following")
        .arg(&following)
        .args(["--format", "plain", "--save"])
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved result to"));

    let saved: Vec<_> = fs::read_dir(&out_dir).unwrap().flatten().collect();
    assert_eq!(saved.len(), 1);
    let name = saved[0].file_name().to_string_lossy().to_string();
    assert!(name.starts_with("Result_") && name.ends_with(".txt"));
    assert_eq!(fs::read_to_string(saved[0].path()).unwrap(), "bob\ndave");
}

#[test]
fn test_validate_command() {
    let dir = TempDir::new().unwrap();
    let (followers, following) = basic_exports(&dir);

    cli()
        .arg("validate")
        .arg("--followers")
        .arg(&followers)
        .arg("--following")
        .arg(&following)
        .assert()
        .success()
        .stdout(predicate::str::contains("look valid"));

    let empty_list = common::write_export(dir.path(), "followers_2.json", "[]").unwrap();
    cli()
        .arg("validate")
        .arg("--followers")
        .arg(&empty_list)
        .arg("--following")
        .arg(&following)
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty or not formatted correctly"));
}

#[test]
fn test_inputs_are_required() {
    cli().arg("analyze").assert().failure();
}

#[test]
fn test_config_command_prints_toml() {
    cli()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[limits]"))
        .stdout(predicate::str::contains("max_file_size_mb = 5"));
}
