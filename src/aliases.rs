//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout global-logrotate.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(ArchiveKey32, 32); // PBKDF2-derived AES-256-GCM key

// Dynamic secrets
dynamic_alias!(LogPassword, String); // Archive password, from any credential source

/// Independent copy of a password, re-wrapped from its exposed value
pub fn copy_password(password: &LogPassword) -> LogPassword {
    LogPassword::new(password.expose_secret().clone())
}
