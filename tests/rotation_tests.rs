// tests/rotation_tests.rs
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use global_logrotate::config::EffectiveConfig;
use global_logrotate::core::{decrypt_to_vec, gunzip_to_vec};
use global_logrotate::credentials::sources::{ConfiguredPassword, InteractivePrompt};
use global_logrotate::credentials::PasswordSource;
use global_logrotate::discovery::discover;
use global_logrotate::rotation::FailureStage;
use global_logrotate::{LogPassword, PasswordResolver, RotationEngine, RotationOutcome};
use tempfile::tempdir;

mod common;
use common::ScriptedPrompter;

fn no_password() -> PasswordResolver {
    PasswordResolver::new(None, Vec::new())
}

fn with_password(pw: &str) -> PasswordResolver {
    let sources: Vec<Box<dyn PasswordSource>> =
        vec![Box::new(ConfiguredPassword(LogPassword::new(pw.to_owned())))];
    PasswordResolver::new(None, sources)
}

fn prompting(prompter: &Arc<ScriptedPrompter>) -> PasswordResolver {
    let sources: Vec<Box<dyn PasswordSource>> = vec![Box::new(InteractivePrompt {
        prompter: prompter.clone(),
        prompt: "Enter encryption password: ",
    })];
    PasswordResolver::new(None, sources)
}

fn archive_path(cfg: &EffectiveConfig, dir: &Path, name: &str) -> PathBuf {
    let ext = if cfg.encrypt { "gz.enc" } else { "gz" };
    dir.join("old_logs")
        .join("20261019")
        .join(format!("{name}.20261019.{ext}"))
}

#[test]
fn test_plain_rotation_end_to_end() {
    common::setup();
    let dir = tempdir().unwrap();
    let source = dir.path().join("app.log");
    let content = b"2026-10-19 INFO request served\n".repeat(10 * 1024 * 1024 / 31);
    fs::write(&source, &content).unwrap();
    fs::set_permissions(&source, fs::Permissions::from_mode(0o640)).unwrap();

    let cfg = common::config_for(dir.path());
    let resolver = no_password();
    let outcome = RotationEngine::new(&cfg, &resolver).rotate_file(&source);

    let expected = archive_path(&cfg, dir.path(), "app.log");
    match &outcome {
        RotationOutcome::Rotated {
            archive,
            encrypted,
            stats,
        } => {
            assert_eq!(archive, &expected);
            assert!(!encrypted);
            assert_eq!(stats.original_size, content.len() as u64);
            assert!(stats.ratio > 90.0);
            assert!(stats.saved() > 0);
        }
        other => panic!("expected Rotated, got {other:?}"),
    }

    assert_eq!(fs::metadata(&source).unwrap().len(), 0);
    assert_eq!(gunzip_to_vec(&fs::read(&expected).unwrap()).unwrap(), content);
    let mode = fs::metadata(&expected).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o640);
}

#[test]
fn test_encrypted_rotation_end_to_end() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("secure.log");
    fs::write(&source, "user=alice action=login\n").unwrap();

    let mut cfg = common::config_for(dir.path());
    cfg.encrypt = true;
    let resolver = with_password("s3cret-pass");
    let outcome = RotationEngine::new(&cfg, &resolver).rotate_file(&source);
    assert!(outcome.is_rotated(), "{outcome:?}");

    let archive = archive_path(&cfg, dir.path(), "secure.log");
    let sealed = fs::read(&archive).unwrap();
    assert_eq!(&sealed[..4], b"GLRE");
    let plain =
        gunzip_to_vec(&decrypt_to_vec(&sealed, &LogPassword::new("s3cret-pass".to_owned())).unwrap())
            .unwrap();
    assert_eq!(plain, b"user=alice action=login\n");
    assert_eq!(fs::metadata(&source).unwrap().len(), 0);
}

#[test]
fn test_second_run_same_day_is_already_rotated() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("app.log");
    fs::write(&source, "first\n").unwrap();

    let cfg = common::config_for(dir.path());
    let resolver = no_password();
    let engine = RotationEngine::new(&cfg, &resolver);
    assert!(engine.rotate_file(&source).is_rotated());

    fs::write(&source, "second\n").unwrap();
    let archive = archive_path(&cfg, dir.path(), "app.log");
    match engine.rotate_file(&source) {
        RotationOutcome::AlreadyRotated { archive: a } => assert_eq!(a, archive),
        other => panic!("expected AlreadyRotated, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&source).unwrap(), "second\n");
    assert_eq!(gunzip_to_vec(&fs::read(&archive).unwrap()).unwrap(), b"first\n");
}

#[test]
fn test_dry_run_changes_nothing() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("app.log");
    fs::write(&source, "keep me\n").unwrap();

    let mut cfg = common::config_for(dir.path());
    cfg.dry_run = true;
    cfg.encrypt = true;
    // Never consulted in a dry run
    let prompter = Arc::new(ScriptedPrompter::new(&[]));
    let resolver = prompting(&prompter);

    match RotationEngine::new(&cfg, &resolver).rotate_file(&source) {
        RotationOutcome::DryRun {
            archive,
            size,
            encrypted,
        } => {
            assert_eq!(archive, archive_path(&cfg, dir.path(), "app.log"));
            assert_eq!(size, 8);
            assert!(encrypted);
        }
        other => panic!("expected DryRun, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&source).unwrap(), "keep me\n");
    assert!(!dir.path().join("old_logs").exists());
    assert_eq!(prompter.times_asked(), 0);
}

#[test]
fn test_missing_and_empty_files_are_skipped() {
    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty.log");
    fs::write(&empty, "").unwrap();

    let cfg = common::config_for(dir.path());
    let resolver = no_password();
    let engine = RotationEngine::new(&cfg, &resolver);
    assert!(matches!(
        engine.rotate_file(&dir.path().join("gone.log")),
        RotationOutcome::Missing
    ));
    assert!(matches!(engine.rotate_file(&empty), RotationOutcome::Empty));
    assert!(!dir.path().join("old_logs").exists());
}

#[test]
fn test_unresolved_password_leaves_source_intact() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("app.log");
    fs::write(&source, "payload\n").unwrap();

    let mut cfg = common::config_for(dir.path());
    cfg.encrypt = true;
    let resolver = no_password();

    match RotationEngine::new(&cfg, &resolver).rotate_file(&source) {
        RotationOutcome::Failed { stage, .. } => assert_eq!(stage, FailureStage::Password),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&source).unwrap(), "payload\n");
    assert!(!archive_path(&cfg, dir.path(), "app.log").exists());
}

#[test]
fn test_custom_old_logs_dir() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("logs/app.log");
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, "x\n").unwrap();

    let mut cfg = common::config_for(&dir.path().join("logs"));
    cfg.old_logs_dir = Some(dir.path().join("archive"));
    let resolver = no_password();
    assert!(RotationEngine::new(&cfg, &resolver).rotate_file(&source).is_rotated());
    assert!(dir
        .path()
        .join("archive/20261019/app.log.20261019.gz")
        .is_file());
}

fn populate(root: &Path) {
    for (i, name) in ["a.log", "b.log", "sub/c.log", "sub/d.log", "e.log"].iter().enumerate() {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("{name}\n").repeat((i + 1) * 100)).unwrap();
    }
    fs::write(root.join("empty.log"), "").unwrap();
}

fn archived(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut out: Vec<(String, Vec<u8>)> = list_files(root)
        .into_iter()
        .filter(|p| p.to_string_lossy().ends_with(".gz"))
        .map(|p| {
            let rel = p.strip_prefix(root).unwrap().to_string_lossy().into_owned();
            (rel, gunzip_to_vec(&fs::read(&p).unwrap()).unwrap())
        })
        .collect();
    out.sort();
    out
}

fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}

#[test]
fn test_parallel_matches_sequential() {
    common::setup();
    let seq_dir = tempdir().unwrap();
    let par_dir = tempdir().unwrap();
    populate(seq_dir.path());
    populate(par_dir.path());

    let seq_cfg = common::config_for(seq_dir.path());
    let mut par_cfg = common::config_for(par_dir.path());
    par_cfg.parallel_jobs = 3;
    let resolver = no_password();

    let seq = RotationEngine::new(&seq_cfg, &resolver)
        .run(&discover(seq_dir.path(), "*.log", None).unwrap())
        .unwrap();
    let candidates = discover(par_dir.path(), "*.log", None).unwrap();
    let par = RotationEngine::new(&par_cfg, &resolver).run(&candidates).unwrap();

    assert_eq!(seq.rotated(), 5);
    assert_eq!(par.rotated(), 5);
    assert_eq!(par.skipped(), 1);
    assert_eq!(par.failed(), 0);
    // summary keeps input order
    let order: Vec<_> = par.outcomes.iter().map(|(p, _)| p.clone()).collect();
    let expected: Vec<_> = candidates.iter().map(|c| c.path.clone()).collect();
    assert_eq!(order, expected);

    assert_eq!(archived(seq_dir.path()), archived(par_dir.path()));
    assert!(matches!(
        par.outcome_for(&par_dir.path().join("empty.log")),
        Some(RotationOutcome::Empty)
    ));
}

#[test]
fn test_parallel_encryption_prompts_once() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let mut cfg = common::config_for(dir.path());
    cfg.encrypt = true;
    cfg.parallel_jobs = 4;
    let prompter = Arc::new(ScriptedPrompter::new(&["typed-once"]));
    let resolver = prompting(&prompter);

    let summary = RotationEngine::new(&cfg, &resolver)
        .run(&discover(dir.path(), "*.log", None).unwrap())
        .unwrap();
    assert_eq!(summary.rotated(), 5);
    assert_eq!(prompter.times_asked(), 1);
}

fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>, std::time::SystemTime)> {
    let mut files: Vec<_> = list_files(root)
        .into_iter()
        .map(|p| {
            let modified = fs::metadata(&p).unwrap().modified().unwrap();
            let content = fs::read(&p).unwrap();
            (p, content, modified)
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}

#[test]
fn test_parallel_encrypted_dry_run_changes_nothing() {
    let dir = tempdir().unwrap();
    populate(dir.path());
    let before = snapshot(dir.path());

    let mut cfg = common::config_for(dir.path());
    cfg.dry_run = true;
    cfg.encrypt = true;
    cfg.parallel_jobs = 4;
    let prompter = Arc::new(ScriptedPrompter::new(&[]));
    let resolver = prompting(&prompter);

    let candidates = discover(dir.path(), "*.log", None).unwrap();
    let summary = RotationEngine::new(&cfg, &resolver).run(&candidates).unwrap();

    assert_eq!(summary.dry_run(), 5);
    assert_eq!(summary.rotated(), 0);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(snapshot(dir.path()), before);
    assert!(!dir.path().join("old_logs").exists());
    assert!(!dir.path().join("sub/old_logs").exists());
    assert_eq!(prompter.times_asked(), 0);
}
