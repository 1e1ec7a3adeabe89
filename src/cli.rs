//! Command-line surface

use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "global-logrotate",
    version,
    about = "Rotate log files into dated, compressed and optionally encrypted archives",
    after_help = "Configuration files:\n  /etc/global-sys-utils/global.conf\n  /etc/global-sys-utils/global.conf.d/*.conf\n\n\
                  First-time encryption setup:\n  global-logrotate --pass-gen\n\n\
                  Examples:\n  global-logrotate -D -p /var/log/myapp\n  global-logrotate --encrypt -D -p /var/log/secure\n  global-logrotate --read /path/to/file.gz.enc"
)]
pub struct Cli {
    /// Use full timestamp format (YYYYMMDDTHH:MM:SS)
    #[arg(short = 'H')]
    pub full_timestamp: bool,

    /// Use date-only format (YYYYMMDD)
    #[arg(short = 'D')]
    pub date_only: bool,

    /// File pattern to rotate (default: *.log)
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Log directory (default: /var/log/apps)
    #[arg(short = 'p', value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Dry-run mode (no changes made)
    #[arg(short = 'n')]
    pub dry_run: bool,

    /// old_logs directory (default: <logdir>/old_logs)
    #[arg(short = 'o', value_name = "PATH")]
    pub old_logs: Option<PathBuf>,

    /// File containing exclude patterns
    #[arg(long = "exclude-from", value_name = "FILE")]
    pub exclude_from: Option<PathBuf>,

    /// Rotate up to N log files in parallel (default: 4)
    #[arg(long, value_name = "N")]
    pub parallel: Option<usize>,

    /// Encrypt rotated logs with AES-256-GCM
    #[arg(long)]
    pub encrypt: bool,

    /// Print a rotated log file (.gz or .gz.enc) to stdout
    #[arg(long, value_name = "FILE")]
    pub read: Option<PathBuf>,

    /// Generate and configure the encryption password (first-time setup)
    #[arg(long = "pass-gen")]
    pub pass_gen: bool,

    /// Reset/change the encryption password
    #[arg(long = "pass-reset")]
    pub pass_reset: bool,

    /// Path to log file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level: error, info, debug
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// Which top-level flow an invocation runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    PassGen,
    PassReset,
    Read(PathBuf),
    Rotate,
}

impl Cli {
    /// `--pass-gen`, then `--pass-reset`, then `--read`, else rotation
    pub fn mode(&self) -> Mode {
        if self.pass_gen {
            Mode::PassGen
        } else if self.pass_reset {
            Mode::PassReset
        } else if let Some(path) = &self.read {
            Mode::Read(path.clone())
        } else {
            Mode::Rotate
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            full_timestamp: self.full_timestamp,
            date_only: self.date_only,
            pattern: self.pattern.clone(),
            log_dir: self.path.clone(),
            dry_run: self.dry_run,
            old_logs_dir: self.old_logs.clone(),
            exclude_file: self.exclude_from.clone(),
            parallel_jobs: self.parallel,
            encrypt: self.encrypt,
            log_file: self.log_file.clone(),
            log_level: self.log_level.clone(),
        }
    }
}
