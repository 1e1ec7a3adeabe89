//! The individual places a password can come from
//!
//! Each source only produces a candidate. Whether the candidate is accepted
//! is decided by [`super::PasswordResolver`] against the configured hash.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error};

use super::prompt::Prompter;
use super::store::read_credentials_file;
use crate::aliases::{copy_password, LogPassword};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Accepted without hash verification
    Trusted,
    /// Must match the configured hash when one exists
    Unverified,
}

#[derive(Debug)]
pub struct SourcedPassword {
    pub password: LogPassword,
    pub confidence: Confidence,
}

impl SourcedPassword {
    fn unverified(password: String) -> Option<Self> {
        (!password.is_empty()).then(|| Self {
            password: LogPassword::new(password),
            confidence: Confidence::Unverified,
        })
    }
}

pub trait PasswordSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch(&self) -> Option<SourcedPassword>;

    /// When true, nothing after this source is consulted, whatever the result
    fn is_final(&self) -> bool {
        false
    }

    /// Report a candidate that failed hash verification
    fn on_mismatch(&self) {
        debug!("Password from {} does not match hash", self.name());
    }
}

/// `ENCRYPT_PASSWORD` from the effective configuration
pub struct ConfiguredPassword(pub LogPassword);

impl PasswordSource for ConfiguredPassword {
    fn name(&self) -> &'static str {
        "configuration"
    }

    fn fetch(&self) -> Option<SourcedPassword> {
        Some(SourcedPassword {
            password: copy_password(&self.0),
            confidence: Confidence::Trusted,
        })
    }
}

/// The invoking user's credentials file
pub struct CredentialsFile(pub PathBuf);

impl PasswordSource for CredentialsFile {
    fn name(&self) -> &'static str {
        "credentials file"
    }

    fn fetch(&self) -> Option<SourcedPassword> {
        read_credentials_file(&self.0).and_then(SourcedPassword::unverified)
    }
}

/// An environment variable, `LOGROTATE_PASSWORD` in production
pub struct EnvVar(pub String);

impl PasswordSource for EnvVar {
    fn name(&self) -> &'static str {
        "environment variable"
    }

    fn fetch(&self) -> Option<SourcedPassword> {
        std::env::var(&self.0)
            .ok()
            .and_then(SourcedPassword::unverified)
    }

    fn on_mismatch(&self) {
        eprintln!("Warning: {} does not match configured hash", self.0);
        error!("{} environment variable does not match configured hash", self.0);
    }
}

/// Last resort: ask whoever is at the terminal
pub struct InteractivePrompt {
    pub prompter: Arc<dyn Prompter>,
    pub prompt: &'static str,
}

impl PasswordSource for InteractivePrompt {
    fn name(&self) -> &'static str {
        "interactive prompt"
    }

    fn fetch(&self) -> Option<SourcedPassword> {
        match self.prompter.read_secret(self.prompt) {
            Ok(input) => SourcedPassword::unverified(input),
            Err(err) => {
                eprintln!("Error reading password: {err}");
                error!("Error reading password: {err}");
                None
            }
        }
    }

    fn is_final(&self) -> bool {
        true
    }

    fn on_mismatch(&self) {
        eprintln!("Error: Password does not match configured hash");
        error!("Entered password does not match configured hash");
    }
}
