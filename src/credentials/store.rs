//! On-disk credential material: the per-user credentials file and the
//! password-hash drop-in

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::aliases::LogPassword;
use crate::config::parse_pairs;
use crate::consts::{
    CREDENTIALS_KEYS, CREDENTIALS_RELATIVE_PATH, ENCRYPTION_DROPIN_FILE, LOG_TIMESTAMP_FORMAT,
};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    pub credentials_file: PathBuf,
    pub dropin_dir: PathBuf,
}

impl CredentialStore {
    pub fn new(credentials_file: impl Into<PathBuf>, dropin_dir: impl Into<PathBuf>) -> Self {
        Self {
            credentials_file: credentials_file.into(),
            dropin_dir: dropin_dir.into(),
        }
    }

    /// `~/.global-sys-utils/config/credentials.ini` for the invoking user
    pub fn for_current_user(dropin_dir: impl Into<PathBuf>) -> Result<Self> {
        let home = dirs::home_dir().ok_or(CoreError::HomeDirUnavailable)?;
        Ok(Self::new(home.join(CREDENTIALS_RELATIVE_PATH), dropin_dir))
    }

    pub fn hash_file(&self) -> PathBuf {
        self.dropin_dir.join(ENCRYPTION_DROPIN_FILE)
    }

    /// Write the credentials file, owner-only (dir 0700, file 0600)
    ///
    /// The value is always double-quoted so the reader's single-layer unquote
    /// gives back the exact password, quotes and edge whitespace included.
    pub fn save_password(&self, password: &LogPassword) -> Result<()> {
        let content = format!(
            "# Global Logrotate Credentials\n\
             # Generated: {}\n\
             # This file contains your encryption password\n\
             # Keep this file secure (chmod 600)\n\
             \n\
             LOGROTATE_PASSWORD = \"{}\"\n",
            Local::now().format(LOG_TIMESTAMP_FORMAT),
            password.expose_secret()
        );
        write_private(&self.credentials_file, 0o700, &content)?;
        debug!("Saved credentials to {}", self.credentials_file.display());
        Ok(())
    }

    /// Write `ENCRYPT_PASSWORD_HASH` into the encryption drop-in
    pub fn save_hash(&self, hash_hex: &str) -> Result<PathBuf> {
        let content = format!(
            "# Global Logrotate Encryption Configuration\n\
             # Generated: {}\n\
             # DO NOT share this file or commit to version control\n\
             \n\
             # Enable encryption by default (optional)\n\
             # ENCRYPT = true\n\
             \n\
             # SHA-256 hash of encryption password\n\
             ENCRYPT_PASSWORD_HASH = {}\n",
            Local::now().format(LOG_TIMESTAMP_FORMAT),
            hash_hex
        );
        let path = self.hash_file();
        write_private(&path, 0o755, &content)?;
        debug!("Saved password hash to {}", path.display());
        Ok(path)
    }
}

/// First `LOGROTATE_PASSWORD` or `password` entry, if the file is readable
pub fn read_credentials_file(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    parse_pairs(&content)
        .into_iter()
        .find(|(key, _)| CREDENTIALS_KEYS.contains(&key.as_str()))
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn write_private(path: &Path, dir_mode: u32, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::DirBuilder::new()
            .recursive(true)
            .mode(dir_mode)
            .create(parent)?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
