//! Public enum types used throughout the crate
//!
//! Central location for the small closed sets of user-visible choices:
//! date-suffix style, log verbosity and archive kinds.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, TimeZone};
use tracing::level_filters::LevelFilter;

use crate::consts::{DATE_ONLY_FORMAT, FULL_TIMESTAMP_FORMAT};

/// Suffix appended to the original file name of an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `YYYYMMDD` (`-D`, `DATE_FORMAT = date`)
    #[default]
    DateOnly,
    /// `YYYYMMDDTHH:MM:SS` (`-H`, `DATE_FORMAT = full`)
    Full,
}

impl DateStyle {
    pub fn from_config(value: &str) -> Self {
        if value == "full" {
            Self::Full
        } else {
            Self::DateOnly
        }
    }

    pub fn suffix<Tz>(self, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            Self::DateOnly => now.format(DATE_ONLY_FORMAT).to_string(),
            Self::Full => now.format(FULL_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Log file verbosity; each level includes the ones before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Unknown values fall back to `Info`
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "error" | "0" => Self::Error,
            "debug" | "2" => Self::Debug,
            _ => Self::Info,
        }
    }

    pub fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

/// What a file on disk holds, judged by its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// `.gz.enc`: compressed, then encrypted
    EncryptedGzip,
    /// `.enc`: encrypted only
    Encrypted,
    /// `.gz.gpg`: produced by releases that shelled out to gpg
    LegacyGpg,
    /// `.gz`
    Gzip,
    Plain,
}

impl ArchiveKind {
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if name.ends_with(".gz.enc") {
            Self::EncryptedGzip
        } else if name.ends_with(".enc") {
            Self::Encrypted
        } else if name.ends_with(".gz.gpg") {
            Self::LegacyGpg
        } else if name.ends_with(".gz") {
            Self::Gzip
        } else {
            Self::Plain
        }
    }

    /// Extension given to new archives
    pub fn rotated_extension(encrypt: bool) -> &'static str {
        if encrypt {
            ".gz.enc"
        } else {
            ".gz"
        }
    }
}
