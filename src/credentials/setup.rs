//! First-time password setup and password reset
//!
//! Both flows store the SHA-256 of the new password in the encryption
//! drop-in and the plaintext in the user's credentials file. Neither touches
//! existing archives: those stay bound to the password they were made with.

use std::path::PathBuf;

use rand::Rng;
use tracing::{error, info};

use super::prompt::Prompter;
use super::store::CredentialStore;
use crate::aliases::LogPassword;
use crate::consts::{GENERATED_PASSWORD_LEN, MIN_PASSWORD_LEN, PASSWORD_CHARSET};
use crate::core::util::{mask_password, password_matches_hash, sha256_hex};
use crate::error::{CoreError, Result};

/// What a completed setup or reset wrote
#[derive(Debug)]
pub struct PasswordChange {
    pub masked: String,
    pub hash_file: PathBuf,
    pub credentials_file: PathBuf,
    /// Saving the credentials file is best-effort
    pub credentials_error: Option<CoreError>,
}

#[derive(Debug)]
pub enum SetupOutcome {
    /// A hash exists already; use reset instead
    AlreadyConfigured,
    Completed(PasswordChange),
}

#[derive(Debug)]
pub enum ResetOutcome {
    /// No hash exists yet; use setup instead
    NotConfigured,
    Completed(PasswordChange),
}

/// Random password over `PASSWORD_CHARSET`
pub fn generate_password(len: usize) -> LogPassword {
    let mut rng = rand::rng();
    let password: String = (0..len)
        .map(|_| PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())] as char)
        .collect();
    LogPassword::new(password)
}

pub fn setup_password(
    store: &CredentialStore,
    prompter: &dyn Prompter,
    existing_hash: Option<&str>,
) -> Result<SetupOutcome> {
    if existing_hash.is_some_and(|h| !h.is_empty()) {
        return Ok(SetupOutcome::AlreadyConfigured);
    }

    let password = choose_password(prompter, "Enter new password: ", "Confirm password: ")?;
    let change = persist(store, &password)?;
    info!("Encryption password configured, hash stored in {}", change.hash_file.display());
    Ok(SetupOutcome::Completed(change))
}

pub fn reset_password(
    store: &CredentialStore,
    prompter: &dyn Prompter,
    existing_hash: Option<&str>,
) -> Result<ResetOutcome> {
    let Some(existing_hash) = existing_hash.filter(|h| !h.is_empty()) else {
        return Ok(ResetOutcome::NotConfigured);
    };

    let current = prompter.read_secret("Enter current password: ")?;
    if !password_matches_hash(&current, existing_hash) {
        error!("Password reset rejected: current password is incorrect");
        return Err(CoreError::IncorrectPassword);
    }

    let password = choose_password(prompter, "Enter new password: ", "Confirm new password: ")?;
    let change = persist(store, &password)?;
    info!("Encryption password reset, hash stored in {}", change.hash_file.display());
    Ok(ResetOutcome::Completed(change))
}

/// Menu: `2` means a user-chosen password, anything else generates one
fn choose_password(
    prompter: &dyn Prompter,
    enter_prompt: &str,
    confirm_prompt: &str,
) -> Result<LogPassword> {
    println!("Choose password option:");
    println!("  1) Generate random password (recommended)");
    println!("  2) Enter custom password");
    println!();
    let choice = prompter.read_line("Select [1/2]: ")?;
    println!();

    if choice.trim() != "2" {
        return Ok(generate_password(GENERATED_PASSWORD_LEN));
    }

    let password = prompter.read_secret(enter_prompt)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    let confirm = prompter.read_secret(confirm_prompt)?;
    if password != confirm {
        return Err(CoreError::PasswordMismatch);
    }
    Ok(LogPassword::new(password))
}

fn persist(store: &CredentialStore, password: &LogPassword) -> Result<PasswordChange> {
    let hash_file = store.save_hash(&sha256_hex(password.expose_secret().as_bytes()))?;
    let credentials_error = store.save_password(password).err();

    Ok(PasswordChange {
        masked: mask_password(password.expose_secret()),
        hash_file,
        credentials_file: store.credentials_file.clone(),
        credentials_error,
    })
}
