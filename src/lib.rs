// src/lib.rs
//! global-logrotate: rotate log files into dated, compressed archives
//!
//! Features:
//! - Recursive discovery with glob include/exclude rules, smallest files first
//! - gzip archives under `old_logs/<YYYYMMDD>/`, source truncated in place
//! - Optional AES-256-GCM encryption (PBKDF2-SHA256 keyed, `GLRE` envelope)
//! - Password resolution from config, credentials file, environment or prompt
//! - Sequential or bounded-parallel rotation

pub mod aliases;
pub mod cli;
pub mod config;
pub mod consts;
pub mod core;
pub mod credentials;
pub mod discovery;
pub mod enums;
pub mod logging;
pub mod rotation;

pub mod error;

// Re-export everything users need at the crate root
pub use aliases::{ArchiveKey32, LogPassword};
pub use config::{load as load_config, ConfigPaths, EffectiveConfig, Overrides};
pub use crate::core::{decrypt_to_vec, encrypt_to_vec, read_archive};
pub use credentials::{CredentialStore, PasswordResolver};
pub use discovery::{discover, Candidate};
pub use error::{CoreError, Result};
pub use rotation::{
    rotate_logs, ArchiveTarget, RotationEngine, RotationOutcome, RunStatus, RunSummary,
};
