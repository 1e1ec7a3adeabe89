use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::defaults::*;
use super::file::FileConfig;
use crate::aliases::LogPassword;
use crate::consts::{ARCHIVE_DAY_FORMAT, DEFAULT_LOG_DIR, OLD_LOGS_DIR_NAME};
use crate::enums::{DateStyle, LogLevel};
use crate::error::{CoreError, Result};

/// Command-line values layered over the config files
///
/// Flags can only switch a setting on; options replace the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub full_timestamp: bool,
    pub date_only: bool,
    pub pattern: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub old_logs_dir: Option<PathBuf>,
    pub exclude_file: Option<PathBuf>,
    pub parallel_jobs: Option<usize>,
    pub encrypt: bool,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Immutable snapshot of the merged configuration for one run
///
/// The clock is read once in [`EffectiveConfig::resolve`], so every file of
/// a run shares the same date suffix and archive day.
#[derive(Debug)]
pub struct EffectiveConfig {
    pub log_dir: PathBuf,
    /// `log_dir` differs from the built-in default and must exist
    pub custom_dir: bool,
    pub pattern: String,
    pub exclude_file: Option<PathBuf>,
    pub parallel_jobs: usize,
    pub dry_run: bool,
    pub date_style: DateStyle,
    pub date_suffix: String,
    /// `YYYYMMDD` subdirectory under the old-logs root
    pub archive_day: String,
    pub old_logs_dir: Option<PathBuf>,
    pub encrypt: bool,
    pub encrypt_password: Option<LogPassword>,
    pub encrypt_password_hash: Option<String>,
    pub log_file: PathBuf,
    pub log_level: LogLevel,
}

impl EffectiveConfig {
    pub fn resolve(file: &FileConfig, overrides: &Overrides, now: DateTime<Local>) -> Self {
        let log_dir = overrides
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_log_dir(file)));
        let custom_dir = log_dir != Path::new(DEFAULT_LOG_DIR);

        // -H wins over -D, and either wins over DATE_FORMAT
        let date_style = if overrides.full_timestamp {
            DateStyle::Full
        } else if overrides.date_only {
            DateStyle::DateOnly
        } else {
            DateStyle::from_config(&default_date_format(file))
        };

        let log_level = overrides
            .log_level
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(LogLevel::parse)
            .unwrap_or_else(|| LogLevel::parse(&default_log_level(file)));

        Self {
            log_dir,
            custom_dir,
            pattern: overrides
                .pattern
                .clone()
                .unwrap_or_else(|| default_pattern(file)),
            exclude_file: overrides
                .exclude_file
                .clone()
                .or_else(|| file.get_opt(KEY_EXCLUDE_FILE).map(PathBuf::from)),
            parallel_jobs: overrides
                .parallel_jobs
                .unwrap_or_else(|| default_parallel_jobs(file)),
            dry_run: overrides.dry_run || file.get_bool(KEY_DRY_RUN, false),
            date_style,
            date_suffix: date_style.suffix(&now),
            archive_day: now.format(ARCHIVE_DAY_FORMAT).to_string(),
            old_logs_dir: overrides
                .old_logs_dir
                .clone()
                .or_else(|| file.get_opt(KEY_OLD_LOGS_DIR).map(PathBuf::from)),
            encrypt: overrides.encrypt || file.get_bool(KEY_ENCRYPT, false),
            encrypt_password: file.get_opt(KEY_ENCRYPT_PASSWORD).map(LogPassword::new),
            encrypt_password_hash: file.get_opt(KEY_ENCRYPT_PASSWORD_HASH),
            log_file: overrides
                .log_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(default_log_file(file))),
            log_level,
        }
    }

    /// Per-run checks that must pass before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.custom_dir && !self.log_dir.is_dir() {
            return Err(CoreError::MissingDirectory(self.log_dir.clone()));
        }
        if self.encrypt && self.encrypt_password.is_none() && self.encrypt_password_hash.is_none()
        {
            return Err(CoreError::PasswordNotConfigured);
        }
        Ok(())
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel_jobs > 1
    }

    /// Root under which dated archive directories are created for files in `file_dir`
    pub fn archive_root(&self, file_dir: &Path) -> PathBuf {
        match &self.old_logs_dir {
            Some(dir) => dir.clone(),
            None => file_dir.join(OLD_LOGS_DIR_NAME),
        }
    }
}
