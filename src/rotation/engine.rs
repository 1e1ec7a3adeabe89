//! The per-file rotation sequence and its two drivers
//!
//! A file is archived (gzip, optionally encrypted), the archive is synced to
//! disk, and only then is the source truncated in place. Truncation instead
//! of rename keeps the writer's open descriptor valid.

use std::fs::{self, OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{DirBuilderExt, MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

use nix::unistd::{chown, Gid, Uid};
use rayon::iter::{ParallelBridge, ParallelIterator};
use tracing::debug;

use super::outcome::{FailureStage, RotationOutcome, RotationStats, RunSummary};
use super::target::ArchiveTarget;
use crate::config::EffectiveConfig;
use crate::core::compress::gzip_to_vec;
use crate::core::crypto::encrypt_to_vec;
use crate::core::util::compression_ratio;
use crate::credentials::PasswordResolver;
use crate::discovery::Candidate;
use crate::error::{CoreError, Result};

/// Ownership and mode captured before the source is touched
#[derive(Debug, Clone, Copy)]
struct OriginalMetadata {
    uid: u32,
    gid: u32,
    mode: u32,
}

pub struct RotationEngine<'a> {
    cfg: &'a EffectiveConfig,
    resolver: &'a PasswordResolver,
}

impl<'a> RotationEngine<'a> {
    pub fn new(cfg: &'a EffectiveConfig, resolver: &'a PasswordResolver) -> Self {
        Self { cfg, resolver }
    }

    /// Sequential when `parallel_jobs <= 1`, otherwise a bounded worker pool
    pub fn run(&self, candidates: &[Candidate]) -> Result<RunSummary> {
        if self.cfg.is_parallel() {
            debug!(
                "Using parallel rotation with {} jobs",
                self.cfg.parallel_jobs
            );
            self.run_parallel(candidates, self.cfg.parallel_jobs)
        } else {
            debug!("Using sequential rotation");
            Ok(self.run_sequential(candidates))
        }
    }

    /// Strict input order
    pub fn run_sequential(&self, candidates: &[Candidate]) -> RunSummary {
        let outcomes = candidates
            .iter()
            .map(|c| (c.path.clone(), self.process(&c.path)))
            .collect();
        RunSummary { outcomes }
    }

    /// At most `jobs` files in flight, admitted in input order; blocks until all finish
    ///
    /// Reports appear in completion order; the summary keeps input order.
    pub fn run_parallel(&self, candidates: &[Candidate], jobs: usize) -> Result<RunSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.max(1))
            .thread_name(|i| format!("rotate-{i}"))
            .build()?;

        let mut indexed: Vec<(usize, RotationOutcome)> = pool.install(|| {
            candidates
                .iter()
                .enumerate()
                .par_bridge()
                .map(|(i, c)| (i, self.process(&c.path)))
                .collect()
        });
        indexed.sort_by_key(|(i, _)| *i);

        let outcomes = indexed
            .into_iter()
            .map(|(i, outcome)| (candidates[i].path.clone(), outcome))
            .collect();
        Ok(RunSummary { outcomes })
    }

    fn process(&self, path: &Path) -> RotationOutcome {
        debug!("Processing file: {}", path.display());
        let outcome = self.rotate_file(path);
        outcome.report(path);
        outcome
    }

    /// Rotate one file; never panics and never aborts siblings
    pub fn rotate_file(&self, path: &Path) -> RotationOutcome {
        let Ok(meta) = fs::metadata(path) else {
            return RotationOutcome::Missing;
        };
        if meta.len() == 0 {
            return RotationOutcome::Empty;
        }

        let original = OriginalMetadata {
            uid: meta.uid(),
            gid: meta.gid(),
            mode: meta.permissions().mode() & 0o7777,
        };

        let target = ArchiveTarget::for_file(path, self.cfg);
        if target.exists() {
            return RotationOutcome::AlreadyRotated {
                archive: target.path,
            };
        }

        if self.cfg.dry_run {
            return RotationOutcome::DryRun {
                archive: target.path,
                size: meta.len(),
                encrypted: self.cfg.encrypt,
            };
        }

        match self.archive(path, &target, original) {
            Ok(stats) => {
                restore_metadata(&target.path, original);
                RotationOutcome::Rotated {
                    archive: target.path,
                    encrypted: self.cfg.encrypt,
                    stats,
                }
            }
            Err((stage, error)) => RotationOutcome::Failed { stage, error },
        }
    }

    fn archive(
        &self,
        path: &Path,
        target: &ArchiveTarget,
        original: OriginalMetadata,
    ) -> std::result::Result<RotationStats, (FailureStage, CoreError)> {
        fs::DirBuilder::new()
            .recursive(true)
            .mode(0o755)
            .create(&target.dir)
            .map_err(|e| (FailureStage::CreateDir, CoreError::Io(e)))?;

        let data = fs::read(path).map_err(|e| (FailureStage::Read, CoreError::Io(e)))?;
        debug!("Read {} bytes from {}", data.len(), path.display());

        let compressed = gzip_to_vec(&data).map_err(|e| (FailureStage::Compress, e))?;
        debug!("Compressed to {} bytes", compressed.len());

        let payload = if self.cfg.encrypt {
            let password = self
                .resolver
                .resolve()
                .ok_or((FailureStage::Password, CoreError::NoPassword))?;
            let sealed =
                encrypt_to_vec(&compressed, &password).map_err(|e| (FailureStage::Encrypt, e))?;
            debug!("Encrypted to {} bytes", sealed.len());
            sealed
        } else {
            compressed
        };

        write_archive(&target.path, &payload, original.mode)
            .map_err(|e| (FailureStage::Write, CoreError::Io(e)))?;

        // Only after the archive is on disk
        truncate_in_place(path).map_err(|e| (FailureStage::Truncate, CoreError::Io(e)))?;

        let original_size = data.len() as u64;
        let archive_size = payload.len() as u64;
        Ok(RotationStats {
            original_size,
            archive_size,
            ratio: compression_ratio(original_size, archive_size),
        })
    }
}

fn write_archive(path: &Path, payload: &[u8], mode: u32) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)?;
    file.write_all(payload)?;
    file.sync_all()
}

fn truncate_in_place(path: &Path) -> std::io::Result<()> {
    OpenOptions::new().write(true).open(path)?.set_len(0)
}

/// Best-effort: ownership commonly can't be restored without privileges
fn restore_metadata(archive: &Path, original: OriginalMetadata) {
    if let Err(err) = chown(
        archive,
        Some(Uid::from_raw(original.uid)),
        Some(Gid::from_raw(original.gid)),
    ) {
        debug!("Could not restore ownership on {}: {err}", archive.display());
    }
    if let Err(err) = fs::set_permissions(archive, Permissions::from_mode(original.mode)) {
        debug!("Could not restore permissions on {}: {err}", archive.display());
    }
}
