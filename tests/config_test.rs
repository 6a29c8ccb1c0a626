//! Integration tests for layered settings loading.
//!
//! Precedence: defaults, then global file, then local `.treebal.toml`.
//! These tests pass explicit paths, so the user's own global config never leaks in.
//! Environment overrides live in `config_env_test.rs` (a separate process).

use std::fs;

use tempfile::TempDir;

use treebal::application::ApplicationError;
use treebal::config::{local_config_path, Settings, DEFAULT_DISPLAY_DEPTH};
use treebal::domain::{Strategy, DEFAULT_MAX_DEPTH};

// ============================================================
// Layering
// ============================================================

#[test]
fn given_no_config_files_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_from(None, Some(dir.path())).unwrap();

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(settings.display_depth, DEFAULT_DISPLAY_DEPTH);
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "max_depth = 500\nstrategy = \"iterative\"\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load_from(None, Some(dir.path())).unwrap();

    // Assert
    assert_eq!(settings.max_depth, 500);
    assert_eq!(settings.strategy, Strategy::Iterative);
    assert_eq!(settings.display_depth, DEFAULT_DISPLAY_DEPTH);
}

#[test]
fn given_global_and_local_config_when_load_then_local_wins_per_field() {
    // Arrange: global sets two fields, local overrides one of them
    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("treebal.toml");
    fs::write(&global, "max_depth = 100\ndisplay_depth = 5\n").unwrap();

    let local_dir = TempDir::new().unwrap();
    fs::write(local_config_path(local_dir.path()), "max_depth = 7\n").unwrap();

    // Act
    let settings = Settings::load_from(Some(&global), Some(local_dir.path())).unwrap();

    // Assert
    assert_eq!(settings.max_depth, 7);
    assert_eq!(settings.display_depth, 5);
    assert_eq!(settings.strategy, Strategy::Recursive);
}

#[test]
fn given_missing_global_file_when_load_then_skipped() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("nope.toml");

    let settings = Settings::load_from(Some(&global), None).unwrap();

    assert_eq!(settings, Settings::default());
}

// ============================================================
// Rejection
// ============================================================

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "max_depth = \"deep\"\n").unwrap();

    let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "{err:?}");
}

#[test]
fn given_unknown_key_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "max_dept = 10\n").unwrap();

    let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "{err:?}");
}

#[test]
fn given_zero_depth_in_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "max_depth = 0\n").unwrap();

    let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "{err:?}");
}

#[test]
fn given_unknown_strategy_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "strategy = \"sideways\"\n").unwrap();

    let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "{err:?}");
}
