//! File-level read path for rotated archives
//!
//! This module handles `--read`: it picks the decoding stages from the
//! file name, building on the pure primitives from crypto.rs and
//! compress.rs.

use std::path::Path;

use tracing::debug;

use crate::core::compress::gunzip_to_vec;
use crate::core::crypto::{decrypt_to_vec, Envelope};
use crate::credentials::PasswordResolver;
use crate::enums::ArchiveKind;
use crate::error::{CoreError, Result};

/// Decode a rotated file back into its original content
///
/// The password is only resolved for encrypted kinds, and only once the
/// envelope header looks sound.
pub fn read_archive(path: &Path, resolver: &PasswordResolver) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(CoreError::FileNotFound(path.to_path_buf()));
    }

    let kind = ArchiveKind::detect(path);
    debug!("Reading {} as {:?}", path.display(), kind);

    if kind == ArchiveKind::LegacyGpg {
        return Err(CoreError::UnsupportedFormat);
    }

    let data = std::fs::read(path)?;
    match kind {
        ArchiveKind::EncryptedGzip => {
            let compressed = decrypt_checked(&data, resolver)?;
            gunzip_to_vec(&compressed)
        }
        ArchiveKind::Encrypted => decrypt_checked(&data, resolver),
        ArchiveKind::Gzip => gunzip_to_vec(&data),
        ArchiveKind::Plain | ArchiveKind::LegacyGpg => Ok(data),
    }
}

/// Reject a mislabelled file before anyone is asked for a password
fn decrypt_checked(data: &[u8], resolver: &PasswordResolver) -> Result<Vec<u8>> {
    Envelope::parse(data)?;
    let password = resolver.resolve().ok_or(CoreError::NoPassword)?;
    decrypt_to_vec(data, &password)
}
