// tests/common.rs
//! Shared test utilities: logging setup, scripted prompts, config fixtures
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Local, TimeZone};
use global_logrotate::config::{EffectiveConfig, FileConfig, Overrides};
use global_logrotate::credentials::Prompter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize test-friendly logging; idempotent
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// Answers prompts from a fixed script and counts how often it was asked
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: AtomicUsize,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| (*a).to_owned()).collect()),
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }

    fn next(&self) -> io::Result<String> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

impl Prompter for ScriptedPrompter {
    fn read_secret(&self, _prompt: &str) -> io::Result<String> {
        self.next()
    }

    fn read_line(&self, _prompt: &str) -> io::Result<String> {
        self.next()
    }
}

pub fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 19, 23, 1, 2).unwrap()
}

/// Sequential, plain-gzip config rooted at `log_dir`
pub fn config_for(log_dir: &Path) -> EffectiveConfig {
    let overrides = Overrides {
        log_dir: Some(log_dir.to_path_buf()),
        date_only: true,
        parallel_jobs: Some(1),
        ..Overrides::default()
    };
    EffectiveConfig::resolve(&FileConfig::default(), &overrides, fixed_now())
}
