//! CLI integration tests for the cadhub binary.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use cadhub::files::hash_bytes;
use cadhub::store::{SqliteStore, Store};
use predicates::prelude::*;
use serde_json::Value;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadhub").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args(["init", "--data-dir", &self.data_dir_str()])
            .assert()
    }

    fn open_store(&self) -> SqliteStore {
        SqliteStore::new(self.data_dir().join("cadhub.db")).expect("open store")
    }
}

#[test]
fn test_init_creates_database() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("Initialized database at"));

    assert!(ctx.data_dir().join("cadhub.db").exists());
    assert!(ctx.open_store().list_projects().unwrap().is_empty());
}

#[test]
fn test_init_is_idempotent() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.init().success();
}

#[test]
fn test_seed_requires_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["seed", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Run 'cadhub init' first"));
}

#[test]
fn test_seed_loads_demo_project() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args(["seed", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Created demo project 'Robotic Arm Assembly'",
        ));

    let store = ctx.open_store();
    let projects = store.list_projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(store.list_branches(&projects[0].id).unwrap().len(), 3);
    assert_eq!(store.list_commits(&projects[0].id).unwrap().len(), 10);
}

#[test]
fn test_config_file_sets_data_dir() {
    let ctx = TestContext::new();
    let data_dir = ctx.temp_dir.child("from-config");
    let config = ctx.temp_dir.child("cadhub.toml");
    config
        .write_str(&format!(
            "data_dir = {:?}\n",
            data_dir.path().to_string_lossy()
        ))
        .unwrap();

    ctx.cmd()
        .args(["--config", &config.path().to_string_lossy(), "init"])
        .assert()
        .success();

    data_dir.child("cadhub.db").assert(predicate::path::exists());
}

#[test]
fn test_bad_config_file_fails() {
    let ctx = TestContext::new();
    let config = ctx.temp_dir.child("cadhub.toml");
    config.write_str("port = \"not a port\"\n").unwrap();

    ctx.cmd()
        .args(["--config", &config.path().to_string_lossy(), "init"])
        .assert()
        .failure();
}

#[test]
fn test_manifest_describes_files() {
    let ctx = TestContext::new();
    let part = ctx.temp_dir.child("Base_Plate.sldprt");
    part.write_binary(b"base plate body").unwrap();
    let drawing = ctx.temp_dir.child("Base_Plate.SLDDRW");
    drawing.write_binary(b"drawing").unwrap();

    let output = ctx
        .cmd()
        .args([
            "manifest",
            &part.path().to_string_lossy(),
            &drawing.path().to_string_lossy(),
        ])
        .output()
        .expect("run manifest");
    assert!(output.status.success());

    let manifest: Value = serde_json::from_slice(&output.stdout).expect("manifest is JSON");
    let entries = manifest.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["filename"], "Base_Plate.sldprt");
    assert_eq!(entries[0]["file_type"], ".SLDPRT");
    assert_eq!(entries[0]["file_size"], 15);
    assert_eq!(entries[0]["content_hash"], hash_bytes(b"base plate body"));
    assert_eq!(entries[1]["file_type"], ".SLDDRW");
}

#[test]
fn test_manifest_missing_file_fails() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["manifest", &ctx.temp_dir.child("absent.step").path().to_string_lossy()])
        .assert()
        .failure();
}
