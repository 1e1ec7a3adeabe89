// tests/config_tests.rs
use std::fs;
use std::path::PathBuf;

use global_logrotate::config::{ConfigPaths, EffectiveConfig, FileConfig, Overrides};
use global_logrotate::enums::{DateStyle, LogLevel};
use global_logrotate::error::CoreError;
use tempfile::tempdir;

mod common;

fn paths_in(root: &std::path::Path) -> ConfigPaths {
    ConfigPaths {
        main_file: root.join("global.conf"),
        dropin_dir: root.join("global.conf.d"),
    }
}

#[test]
fn test_dropins_apply_in_sorted_order_after_main_file() {
    common::setup();
    let dir = tempdir().unwrap();
    let paths = paths_in(dir.path());
    fs::create_dir_all(&paths.dropin_dir).unwrap();

    fs::write(&paths.main_file, "PATTERN = *.txt\nPARALLEL_JOBS = 2\nLOG_LEVEL = error\n").unwrap();
    fs::write(paths.dropin_dir.join("20-late.conf"), "PARALLEL_JOBS = 8\n").unwrap();
    fs::write(paths.dropin_dir.join("10-early.conf"), "PARALLEL_JOBS = 6\nLOG_LEVEL = debug\n").unwrap();
    fs::write(paths.dropin_dir.join("99-ignored.bak"), "PATTERN = *.nope\n").unwrap();

    let file = FileConfig::load(&paths);
    let cfg = EffectiveConfig::resolve(&file, &Overrides::default(), common::fixed_now());
    assert_eq!(cfg.pattern, "*.txt");
    assert_eq!(cfg.parallel_jobs, 8);
    assert_eq!(cfg.log_level, LogLevel::Debug);
}

#[test]
fn test_missing_files_leave_defaults() {
    let dir = tempdir().unwrap();
    let file = FileConfig::load(&paths_in(&dir.path().join("absent")));
    assert_eq!(file, FileConfig::default());
}

#[test]
fn test_command_line_beats_files() {
    let mut file = FileConfig::default();
    file.merge_str("LOG_DIR = /srv/logs\nPATTERN = *.txt\nDATE_FORMAT = full\nPARALLEL_JOBS = oops\n");

    let overrides = Overrides {
        pattern: Some("*.out".to_owned()),
        date_only: true,
        log_level: Some("debug".to_owned()),
        ..Overrides::default()
    };
    let cfg = EffectiveConfig::resolve(&file, &overrides, common::fixed_now());
    assert_eq!(cfg.log_dir, PathBuf::from("/srv/logs"));
    assert!(cfg.custom_dir);
    assert_eq!(cfg.pattern, "*.out");
    assert_eq!(cfg.date_style, DateStyle::DateOnly);
    // unparsable integers fall back to the built-in default
    assert_eq!(cfg.parallel_jobs, 4);
    assert_eq!(cfg.log_level, LogLevel::Debug);
}

#[test]
fn test_empty_values_count_as_unset() {
    let mut file = FileConfig::default();
    file.merge_str("PATTERN =\nENCRYPT_PASSWORD = \"\"\nENCRYPT = yes\n");
    let cfg = EffectiveConfig::resolve(&file, &Overrides::default(), common::fixed_now());
    assert_eq!(cfg.pattern, "*.log");
    assert!(cfg.encrypt_password.is_none());
    assert!(cfg.encrypt);
}

#[test]
fn test_custom_dir_must_exist() {
    let dir = tempdir().unwrap();
    let cfg = common::config_for(&dir.path().join("missing"));
    assert!(matches!(cfg.validate(), Err(CoreError::MissingDirectory(_))));

    let cfg = common::config_for(dir.path());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_hash_alone_satisfies_encrypt_validation() {
    let dir = tempdir().unwrap();
    let mut cfg = common::config_for(dir.path());
    cfg.encrypt = true;
    cfg.encrypt_password_hash = Some("ab".repeat(32));
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_non_positive_parallel_jobs_mean_sequential() {
    for value in ["-1", "0", "1"] {
        let mut file = FileConfig::default();
        file.merge_str(&format!("PARALLEL_JOBS = {value}\n"));
        let cfg = EffectiveConfig::resolve(&file, &Overrides::default(), common::fixed_now());
        assert_eq!(cfg.parallel_jobs, 1, "PARALLEL_JOBS = {value}");
        assert!(!cfg.is_parallel());
    }

    let mut file = FileConfig::default();
    file.merge_str("PARALLEL_JOBS = 6\n");
    let cfg = EffectiveConfig::resolve(&file, &Overrides::default(), common::fixed_now());
    assert_eq!(cfg.parallel_jobs, 6);
    assert!(cfg.is_parallel());
}
