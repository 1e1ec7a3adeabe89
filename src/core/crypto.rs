//! Pure cryptographic primitives: no I/O
//!
//! Encrypted archives are a self-describing envelope:
//!
//! ```text
//! MAGIC "GLRE" (4) | SALT (32) | NONCE (12) | AES-256-GCM CIPHERTEXT + TAG
//! ```
//!
//! The key is PBKDF2-HMAC-SHA256(password, salt, 100 000 rounds). Salt and
//! nonce are fresh for every call, so the envelope never repeats and never
//! carries password material.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit};
use rand::RngCore;
use sha2::Sha256;

use crate::aliases::{ArchiveKey32, LogPassword};
use crate::consts::{
    ENCRYPT_MAGIC, HEADER_SIZE, KDF_ITERATIONS, KEY_SIZE, MIN_ENVELOPE_SIZE, NONCE_SIZE, SALT_SIZE,
};
use crate::error::{CoreError, Result};

/// Borrowed view of a parsed envelope
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    pub salt: &'a [u8],
    pub nonce: &'a [u8],
    pub ciphertext: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split `data` into its parts, checking length first and magic second
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < MIN_ENVELOPE_SIZE {
            return Err(CoreError::EnvelopeTooShort);
        }
        if !data.starts_with(ENCRYPT_MAGIC) {
            return Err(CoreError::InvalidEnvelope);
        }

        let (salt, rest) = data[ENCRYPT_MAGIC.len()..].split_at(SALT_SIZE);
        let (nonce, ciphertext) = rest.split_at(NONCE_SIZE);
        Ok(Self {
            salt,
            nonce,
            ciphertext,
        })
    }
}

/// PBKDF2-HMAC-SHA256 → 256-bit key
pub fn derive_key(password: &LogPassword, salt: &[u8]) -> ArchiveKey32 {
    ArchiveKey32::new(pbkdf2::pbkdf2_hmac_array::<Sha256, KEY_SIZE>(
        password.expose_secret().as_bytes(),
        salt,
        KDF_ITERATIONS,
    ))
}

/// Encrypt plaintext in memory → envelope bytes
pub fn encrypt_to_vec(plaintext: &[u8], password: &LogPassword) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce = [0u8; NONCE_SIZE];
    let mut rng = rand::rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce);

    let key = derive_key(password, &salt);
    let cipher =
        Aes256Gcm::new_from_slice(key.expose_secret()).map_err(|_| CoreError::EncryptionFailed)?;
    let ciphertext = cipher
        .encrypt(aes_gcm::Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CoreError::EncryptionFailed)?;

    let mut out = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    out.extend_from_slice(ENCRYPT_MAGIC);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt envelope bytes → plaintext
///
/// Any authentication failure maps to [`CoreError::DecryptionFailed`].
pub fn decrypt_to_vec(data: &[u8], password: &LogPassword) -> Result<Vec<u8>> {
    let envelope = Envelope::parse(data)?;
    let key = derive_key(password, envelope.salt);
    let cipher =
        Aes256Gcm::new_from_slice(key.expose_secret()).map_err(|_| CoreError::DecryptionFailed)?;
    cipher
        .decrypt(aes_gcm::Nonce::from_slice(envelope.nonce), envelope.ciphertext)
        .map_err(|_| CoreError::DecryptionFailed)
}
