//! One rotation run: validate, discover, rotate
//!
//! Every `Err` out of [`rotate_logs`] is a per-run configuration error and
//! is raised before any file is touched. Per-file problems stay inside the
//! returned [`RunSummary`].

use tracing::{debug, info};

use super::engine::RotationEngine;
use super::outcome::RunSummary;
use crate::config::EffectiveConfig;
use crate::credentials::PasswordResolver;
use crate::discovery::{find_log_files, load_exclude_patterns, FileFilter};
use crate::error::Result;

#[derive(Debug)]
pub enum RunStatus {
    /// Nothing matched the pattern; still a success
    NoFiles,
    Completed(RunSummary),
}

pub fn rotate_logs(cfg: &EffectiveConfig, resolver: &PasswordResolver) -> Result<RunStatus> {
    cfg.validate()?;

    info!(
        "Starting rotation - Dir: {}, Pattern: {}, Encrypt: {}, DryRun: {}",
        cfg.log_dir.display(),
        cfg.pattern,
        cfg.encrypt,
        cfg.dry_run
    );

    let excludes = match &cfg.exclude_file {
        Some(path) => {
            let patterns = load_exclude_patterns(path)?;
            println!("Excluding patterns from: {}", path.display());
            for pattern in &patterns {
                println!("  - {pattern}");
            }
            patterns
        }
        None => Vec::new(),
    };

    let filter = FileFilter::new(&cfg.pattern, &excludes)?;
    let candidates = find_log_files(&cfg.log_dir, &filter);

    if candidates.is_empty() {
        let msg = format!(
            "No files matching pattern '{}' found in {}",
            cfg.pattern,
            cfg.log_dir.display()
        );
        println!("{msg}");
        info!("{msg}");
        return Ok(RunStatus::NoFiles);
    }

    info!("Found {} files to rotate", candidates.len());
    debug!(
        "Files: {:?}",
        candidates.iter().map(|c| &c.path).collect::<Vec<_>>()
    );

    let summary = RotationEngine::new(cfg, resolver).run(&candidates)?;
    info!(
        "Rotation completed (rotated: {}, skipped: {}, dry-run: {}, failed: {})",
        summary.rotated(),
        summary.skipped(),
        summary.dry_run(),
        summary.failed()
    );
    Ok(RunStatus::Completed(summary))
}
