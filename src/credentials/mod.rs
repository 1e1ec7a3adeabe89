//! Credential resolution and password management
//!
//! - [`PasswordResolver`]: ordered sources, hash verification, process cache
//! - [`CredentialStore`]: credentials file and hash drop-in on disk
//! - [`setup_password`] / [`reset_password`]: the `--pass-gen` and `--pass-reset` flows

pub mod prompt;
pub mod resolver;
pub mod setup;
pub mod sources;
pub mod store;

pub use prompt::{Prompter, TerminalPrompter};
pub use resolver::{PasswordResolver, DECRYPT_PROMPT, ENCRYPT_PROMPT};
pub use setup::{
    generate_password, reset_password, setup_password, PasswordChange, ResetOutcome, SetupOutcome,
};
pub use sources::{Confidence, PasswordSource, SourcedPassword};
pub use store::{read_credentials_file, CredentialStore};
