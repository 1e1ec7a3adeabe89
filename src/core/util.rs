//! Small utility functions used across the crate
//!
//! Hashing, human-readable sizes and password masking.
//! Keep this light; split it once it grows.

use sha2::{Digest, Sha256};

/// Compute SHA-256 and return it as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// True when `password` hashes to `expected_hex` (hex case is ignored)
pub fn password_matches_hash(password: &str, expected_hex: &str) -> bool {
    sha256_hex(password.as_bytes()).eq_ignore_ascii_case(expected_hex.trim())
}

/// Binary-unit size, e.g. `512 B`, `1.50 KB`, `10.00 MB`
pub fn format_size(bytes: i64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    let b = bytes as f64;
    let abs = b.abs();
    if abs >= TB {
        format!("{:.2} TB", b / TB)
    } else if abs >= GB {
        format!("{:.2} GB", b / GB)
    } else if abs >= MB {
        format!("{:.2} MB", b / MB)
    } else if abs >= KB {
        format!("{:.2} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Show only the first and last character
pub fn mask_password(password: &str) -> String {
    let chars: Vec<char> = password.chars().collect();
    if chars.len() <= 2 {
        return "****".to_owned();
    }
    let mut masked = String::with_capacity(chars.len());
    masked.push(chars[0]);
    masked.extend(std::iter::repeat('*').take(chars.len() - 2));
    masked.push(chars[chars.len() - 1]);
    masked
}

/// Percentage saved by compression; zero for empty input
pub fn compression_ratio(original: u64, archived: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - archived as f64 / original as f64) * 100.0
}
