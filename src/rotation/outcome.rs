//! Per-file results and how they are reported
//!
//! Every outcome is reported twice: a human line on stdout/stderr and a
//! structured line in the log file.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, error, info};

use crate::consts::CONSOLE_TIMESTAMP_FORMAT;
use crate::core::util::format_size;
use crate::error::CoreError;

/// Step of the per-file sequence that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    CreateDir,
    Read,
    Compress,
    Password,
    Encrypt,
    Write,
    Truncate,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreateDir => "creating backup dir",
            Self::Read => "reading file",
            Self::Compress => "compressing file",
            Self::Password => "resolving encryption password",
            Self::Encrypt => "encrypting file",
            Self::Write => "writing archived file",
            Self::Truncate => "truncating file",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationStats {
    pub original_size: u64,
    pub archive_size: u64,
    /// `(1 - archive/original) * 100`
    pub ratio: f64,
}

impl RotationStats {
    /// Negative when the archive is larger than the source
    pub fn saved(&self) -> i64 {
        self.original_size as i64 - self.archive_size as i64
    }
}

#[derive(Debug)]
pub enum RotationOutcome {
    Missing,
    Empty,
    AlreadyRotated {
        archive: PathBuf,
    },
    DryRun {
        archive: PathBuf,
        size: u64,
        encrypted: bool,
    },
    Rotated {
        archive: PathBuf,
        encrypted: bool,
        stats: RotationStats,
    },
    Failed {
        stage: FailureStage,
        error: CoreError,
    },
}

impl RotationOutcome {
    pub fn is_rotated(&self) -> bool {
        matches!(self, Self::Rotated { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn report(&self, source: &Path) {
        let ts = Local::now().format(CONSOLE_TIMESTAMP_FORMAT);
        let src = source.display();

        match self {
            Self::Missing => {
                println!("{ts}: Skipping missing file: {src}");
                error!("Skipping missing file: {src}");
            }
            Self::Empty => {
                println!("{ts}: Skipping empty file: {src}");
                debug!("Skipping empty file: {src}");
            }
            Self::AlreadyRotated { .. } => {
                println!("{ts}: Already rotated, skipping: {src}");
                info!("Already rotated, skipping: {src}");
            }
            Self::DryRun {
                archive,
                size,
                encrypted,
            } => {
                println!(
                    "[DRY-RUN] Would Rotate: {src} ({}) -> {}{}",
                    format_size(*size as i64),
                    archive.display(),
                    encrypted_tag(*encrypted)
                );
                info!("[DRY-RUN] Would rotate: {src} -> {}", archive.display());
            }
            Self::Rotated {
                archive,
                encrypted,
                stats,
            } => {
                println!(
                    "{ts}: Rotated: {src} -> {}{}\n           Size: {} -> {} ({:.1}% compression, saved {})",
                    archive.display(),
                    encrypted_tag(*encrypted),
                    format_size(stats.original_size as i64),
                    format_size(stats.archive_size as i64),
                    stats.ratio,
                    format_size(stats.saved())
                );
                info!(
                    "Rotated: {src} -> {} (size: {} -> {}, ratio: {:.1}%)",
                    archive.display(),
                    stats.original_size,
                    stats.archive_size,
                    stats.ratio
                );
            }
            Self::Failed { stage, error } => {
                eprintln!("Error {stage}: {error}");
                error!("Error {stage} {src}: {error}");
            }
        }
    }
}

fn encrypted_tag(encrypted: bool) -> &'static str {
    if encrypted {
        " [ENCRYPTED]"
    } else {
        ""
    }
}

/// Counts over one run, plus every outcome in input order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(PathBuf, RotationOutcome)>,
}

impl RunSummary {
    pub fn rotated(&self) -> usize {
        self.count(RotationOutcome::is_rotated)
    }

    pub fn failed(&self) -> usize {
        self.count(RotationOutcome::is_failed)
    }

    pub fn dry_run(&self) -> usize {
        self.count(|o| matches!(o, RotationOutcome::DryRun { .. }))
    }

    /// Missing, empty and already-rotated files
    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                RotationOutcome::Missing
                    | RotationOutcome::Empty
                    | RotationOutcome::AlreadyRotated { .. }
            )
        })
    }

    pub fn outcome_for(&self, path: &Path) -> Option<&RotationOutcome> {
        self.outcomes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, o)| o)
    }

    fn count(&self, pred: impl Fn(&RotationOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}
