// src/error.rs
//! Public error type for the entire crate

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to install logger: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Wrong password and tampered ciphertext are deliberately indistinguishable
    #[error("decryption failed - incorrect password or corrupted file")]
    DecryptionFailed,

    #[error("encrypted data too short")]
    EnvelopeTooShort,

    #[error("invalid encrypted file format")]
    InvalidEnvelope,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("custom log path '{}' does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("exclude file '{}' does not exist", .0.display())]
    MissingExcludeFile(PathBuf),

    #[error("--encrypt requires password to be configured")]
    PasswordNotConfigured,

    #[error("no encryption password available")]
    NoPassword,

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("current password is incorrect")]
    IncorrectPassword,

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("legacy GPG format (.gz.gpg) is no longer supported. Please use gpg command directly to decrypt")]
    UnsupportedFormat,

    #[error("could not determine home directory")]
    HomeDirUnavailable,
}
