//! Integration tests for the foliod CLI commands.
//!
//! Each test works in its own temporary directory; they run serially to keep
//! the binary's output readable when something fails.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::{tempdir, TempDir};

// Helper function to create a clean command instance
fn foliod() -> Command { Command::cargo_bin("foliod").unwrap() }

/// Paths used by a test archive.
struct Paths {
  _dir:     TempDir,
  config:   PathBuf,
  database: PathBuf,
  uploads:  PathBuf,
  issues:   PathBuf,
}

fn temp_paths() -> Paths {
  let dir = tempdir().unwrap();
  Paths {
    config: dir.path().join("config").join("config.toml"),
    database: dir.path().join("data").join("folio.db"),
    uploads: dir.path().join("data").join("uploads"),
    issues: dir.path().join("articles"),
    _dir: dir,
  }
}

/// `foliod init` with every path pointed into the temporary directory.
fn init(paths: &Paths) -> assert_cmd::assert::Assert {
  foliod()
    .arg("init")
    .arg("--config")
    .arg(&paths.config)
    .arg("--database")
    .arg(&paths.database)
    .arg("--uploads")
    .arg(&paths.uploads)
    .arg("--issues")
    .arg(&paths.issues)
    .arg("--accept-defaults")
    .assert()
}

#[test]
#[serial]
fn test_init_and_clean() {
  let paths = temp_paths();

  init(&paths).success().stdout(predicate::str::contains("Folio initialized successfully"));

  assert!(paths.config.exists());
  assert!(paths.database.exists());
  assert!(paths.uploads.is_dir());
  let written = std::fs::read_to_string(&paths.config).unwrap();
  assert!(written.contains("folio.db"));
  assert!(written.contains("allowed_extensions"));

  // Clean reads the database location back from the configuration file
  foliod()
    .arg("clean")
    .arg("--config")
    .arg(&paths.config)
    .arg("--accept-defaults")
    .assert()
    .success()
    .stdout(predicate::str::contains("Database files cleaned"));

  assert!(!paths.database.exists());
  assert!(paths.uploads.is_dir());
}

#[test]
#[serial]
fn test_init_keeps_existing_config() {
  let paths = temp_paths();
  init(&paths).success();
  let original = std::fs::read_to_string(&paths.config).unwrap();

  foliod()
    .arg("init")
    .arg("--config")
    .arg(&paths.config)
    .arg("--bind")
    .arg("0.0.0.0:9999")
    .arg("--accept-defaults")
    .assert()
    .success()
    .stdout(predicate::str::contains("Configuration already exists"));

  assert_eq!(std::fs::read_to_string(&paths.config).unwrap(), original);
}

#[test]
#[serial]
fn test_clean_without_database() {
  let paths = temp_paths();

  foliod()
    .arg("clean")
    .arg("--config")
    .arg(&paths.config)
    .arg("--database")
    .arg(&paths.database)
    .arg("--accept-defaults")
    .assert()
    .failure()
    .stderr(predicate::str::contains("✗"));

  std::fs::create_dir_all(paths.config.parent().unwrap()).unwrap();
  std::fs::write(&paths.config, "").unwrap();
  foliod()
    .arg("clean")
    .arg("--config")
    .arg(&paths.config)
    .arg("--database")
    .arg(&paths.database)
    .arg("--accept-defaults")
    .assert()
    .success()
    .stdout(predicate::str::contains("No database found"));
}

#[test]
#[serial]
fn test_invalid_config_is_reported() {
  let paths = temp_paths();
  std::fs::create_dir_all(paths.config.parent().unwrap()).unwrap();
  std::fs::write(&paths.config, "max_upload_bytes = \"lots\"").unwrap();

  foliod()
    .arg("serve")
    .arg("--config")
    .arg(&paths.config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("max_upload_bytes"));
}

#[test]
fn test_help_lists_commands() {
  foliod()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("serve"))
    .stdout(predicate::str::contains("init"))
    .stdout(predicate::str::contains("clean"));
}
