//! Ordered password resolution with a process-lifetime cache

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::prompt::Prompter;
use super::sources::{
    Confidence, ConfiguredPassword, CredentialsFile, EnvVar, InteractivePrompt, PasswordSource,
    SourcedPassword,
};
use crate::aliases::{copy_password, LogPassword};
use crate::config::EffectiveConfig;
use crate::consts::PASSWORD_ENV_VAR;
use crate::core::util::password_matches_hash;

pub const ENCRYPT_PROMPT: &str = "Enter encryption password: ";
pub const DECRYPT_PROMPT: &str = "Enter decryption password: ";

#[derive(Debug)]
enum Cached {
    Unresolved,
    Resolved(LogPassword),
    Unavailable,
}

/// Walks its sources in order and memoises the first accepted password
///
/// The cache sits in front of every source. Its lock is held for the whole
/// walk, so concurrent rotation workers never prompt twice. A run that
/// found no password remembers that too.
pub struct PasswordResolver {
    hash: Option<String>,
    sources: Vec<Box<dyn PasswordSource>>,
    cache: Mutex<Cached>,
}

impl PasswordResolver {
    pub fn new(hash: Option<String>, sources: Vec<Box<dyn PasswordSource>>) -> Self {
        Self {
            hash: hash.filter(|h| !h.is_empty()),
            sources,
            cache: Mutex::new(Cached::Unresolved),
        }
    }

    /// Config password, credentials file, `LOGROTATE_PASSWORD`, then the prompt
    pub fn standard(
        cfg: &EffectiveConfig,
        credentials_file: Option<PathBuf>,
        prompter: Arc<dyn Prompter>,
        prompt: &'static str,
    ) -> Self {
        let mut sources: Vec<Box<dyn PasswordSource>> = Vec::with_capacity(4);
        if let Some(password) = &cfg.encrypt_password {
            sources.push(Box::new(ConfiguredPassword(copy_password(password))));
        }
        if let Some(path) = credentials_file {
            sources.push(Box::new(CredentialsFile(path)));
        }
        sources.push(Box::new(EnvVar(PASSWORD_ENV_VAR.to_owned())));
        sources.push(Box::new(InteractivePrompt { prompter, prompt }));

        Self::new(cfg.encrypt_password_hash.clone(), sources)
    }

    /// `None` means no password is available for this run
    pub fn resolve(&self) -> Option<LogPassword> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        match &*cache {
            Cached::Resolved(password) => return Some(copy_password(password)),
            Cached::Unavailable => return None,
            Cached::Unresolved => {}
        }

        let resolved = self.walk_sources();
        *cache = match &resolved {
            Some(password) => Cached::Resolved(copy_password(password)),
            None => Cached::Unavailable,
        };
        resolved
    }

    fn walk_sources(&self) -> Option<LogPassword> {
        for source in &self.sources {
            if let Some(candidate) = source.fetch() {
                if self.accepts(&candidate) {
                    debug!("Password loaded from {}", source.name());
                    return Some(candidate.password);
                }
                source.on_mismatch();
            }
            if source.is_final() {
                break;
            }
        }
        None
    }

    fn accepts(&self, candidate: &SourcedPassword) -> bool {
        match (&self.hash, candidate.confidence) {
            (_, Confidence::Trusted) | (None, _) => true,
            (Some(hash), Confidence::Unverified) => {
                password_matches_hash(candidate.password.expose_secret(), hash)
            }
        }
    }
}
