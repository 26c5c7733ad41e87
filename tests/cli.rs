//
//  bitbucket-checkout
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[core]
credential = "ci-key"
credential_kind = "ssh"

[hosts."bitbucket.test"]
server_url = "https://bitbucket.test"
ssh_port = 7999
"#;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn bb_checkout(config: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("bb-checkout").unwrap();
    cmd.env("BB_CHECKOUT_CONFIG", config.path())
        .env_remove("BB_HOST")
        .env_remove("BB_DEBUG");
    cmd
}

#[test]
fn test_uri_cloud_https() {
    let config = config_file("");
    bb_checkout(&config)
        .args(["uri", "tester/test-repo"])
        .assert()
        .success()
        .stdout("https://bitbucket.org/tester/test-repo.git\n");
}

#[test]
fn test_uri_server_ssh_uses_configured_port() {
    let config = config_file(CONFIG);
    bb_checkout(&config)
        .args(["uri", "PROJ/repo", "--host", "bitbucket.test", "--ssh"])
        .assert()
        .success()
        .stdout("ssh://git@bitbucket.test:7999/PROJ/repo.git\n");
}

#[test]
fn test_uri_ssh_port_flag_overrides_config() {
    let config = config_file(CONFIG);
    bb_checkout(&config)
        .args(["uri", "PROJ/repo", "--host", "bitbucket.test", "--ssh", "--ssh-port", "22"])
        .assert()
        .success()
        .stdout("ssh://git@bitbucket.test:22/PROJ/repo.git\n");
}

#[test]
fn test_uri_mercurial_on_server_fails() {
    let config = config_file(CONFIG);
    bb_checkout(&config)
        .args(["uri", "PROJ/repo", "--host", "bitbucket.test", "--hg"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not host hg repositories"));
}

#[test]
fn test_uri_rejects_bad_repository() {
    let config = config_file("");
    bb_checkout(&config)
        .args(["uri", "test-repo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid repository format"));
}

#[test]
fn test_plan_server_fork_json() {
    let config = config_file(CONFIG);
    let output = bb_checkout(&config)
        .args([
            "plan",
            "PROJ/repo",
            "--host",
            "bitbucket.test",
            "--pr",
            "2",
            "--from",
            "~user/repo-fork",
            "--from-branch",
            "feature",
            "--target",
            "main",
            "--merge",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let remotes = json["remotes"].as_array().unwrap();
    assert_eq!(remotes.len(), 2);
    assert_eq!(remotes[0]["url"], "ssh://git@bitbucket.test:7999/PROJ/repo.git");
    assert_eq!(
        remotes[0]["refspec"],
        "+refs/pull-requests/2/from:refs/remotes/origin/PR-2"
    );
    assert_eq!(remotes[0]["credential"]["id"], "ci-key");
    assert_eq!(remotes[1]["name"], "upstream");
    assert_eq!(json["merge"]["base_remote_ref"], "remotes/upstream/main");
    assert_eq!(json["browser_url"], "https://bitbucket.test/projects/PROJ/repos/repo");
}

#[test]
fn test_plan_branch_table() {
    let config = config_file("");
    bb_checkout(&config)
        .args(["plan", "tester/test-repo", "--branch", "main", "--commit", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://bitbucket.org/tester/test-repo.git"))
        .stdout(predicate::str::contains("main @ abc123"));
}

#[test]
fn test_plan_missing_clone_link() {
    let config = config_file("");
    bb_checkout(&config)
        .args([
            "plan",
            "tester/test-repo",
            "--branch",
            "main",
            "--credential",
            "key",
            "--ssh-key",
            "--clone-link",
            "https=https://bitbucket.org/tester/test-repo.git",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No ssh clone link"));
}

#[test]
fn test_plan_without_head_is_usage_error() {
    let config = config_file("");
    bb_checkout(&config)
        .args(["plan", "tester/test-repo"])
        .assert()
        .code(bitbucket_checkout::exit_codes::USAGE);
}

#[test]
fn test_invalid_config_fails() {
    let config = config_file("[core]\ncredential_kind = \"token\"\n");
    bb_checkout(&config)
        .args(["uri", "tester/test-repo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn test_version() {
    let config = config_file("");
    bb_checkout(&config)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bb-checkout version"));
}
