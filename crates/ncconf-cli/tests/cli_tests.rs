#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ncconf_test_utils::{fake_install, listing, sample_system};
use serde_json::Value;

fn fake_php(dir: &Path) -> PathBuf {
    std::fs::write(dir.join("listing.json"), listing(&sample_system())).unwrap();
    let php = dir.join("fake-php");
    std::fs::write(
        &php,
        "#!/bin/sh\ncase \"$2\" in\n  config:list) cat listing.json ;;\n  *) echo \"$@\" >> calls.log ;;\nesac\n",
    )
    .unwrap();
    std::fs::set_permissions(&php, std::fs::Permissions::from_mode(0o755)).unwrap();
    php
}

fn ncconf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ncconf"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("NCCONF_PHP")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn applies_inline_configuration() {
    let dir = fake_install();
    let php = fake_php(dir.path());
    let path = dir.path().display().to_string();
    let php = php.display().to_string();

    let output = ncconf(&["--path", &path, "--php", &php, "--inline", r#"{"loglevel": 0, "maintenance": false}"#]);

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["changed"], true);
    assert_eq!(report["applied"], 1);
    let calls = std::fs::read_to_string(dir.path().join("calls.log")).unwrap();
    assert_eq!(calls.trim(), "occ config:system:set loglevel --value=0 --type=integer");
}

#[test]
fn check_mode_changes_nothing() {
    let dir = fake_install();
    let php = fake_php(dir.path());
    let config = dir.path().join("nextcloud.yaml");
    std::fs::write(&config, "redis:\n  port: 6380\n").unwrap();

    let output = ncconf(&[
        "--path",
        &dir.path().join("occ").display().to_string(),
        "--php",
        &php.display().to_string(),
        "--config",
        &config.display().to_string(),
        "--check",
    ]);

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["changed"], true);
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["applied"], 0);
    assert!(!dir.path().join("calls.log").exists());
}

#[test]
fn missing_install_fails_with_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nowhere").display().to_string();

    let output = ncconf(&["--path", &path, "--inline", "{}"]);

    assert_eq!(output.status.code(), Some(1));
    let doc = stdout_json(&output);
    assert_eq!(doc["failed"], true);
    assert_eq!(doc["changed"], false);
    assert!(doc["msg"].as_str().unwrap().contains("nowhere"));
}

#[test]
fn non_mapping_declared_value_fails() {
    let dir = fake_install();
    let output = ncconf(&["--path", &dir.path().display().to_string(), "--inline", "[1, 2]"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["failed"], true);
}
