//! global-logrotate: rotate, read and protect log archives on one host

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::{CommandFactory, Parser};
use tracing::{debug, error, info};

use global_logrotate::cli::{Cli, Mode};
use global_logrotate::config::{ConfigPaths, EffectiveConfig, FileConfig};
use global_logrotate::consts::VERSION;
use global_logrotate::credentials::{
    reset_password, setup_password, CredentialStore, PasswordChange, PasswordResolver, Prompter,
    ResetOutcome, SetupOutcome, TerminalPrompter, DECRYPT_PROMPT, ENCRYPT_PROMPT,
};
use global_logrotate::logging::{self, LogGuard};
use global_logrotate::{read_archive, rotate_logs, CoreError};

fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    }

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let paths = ConfigPaths::system();
    let file_config = FileConfig::load(&paths);
    let cfg = EffectiveConfig::resolve(&file_config, &cli.overrides(), Local::now());
    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter);

    match cli.mode() {
        Mode::PassGen => pass_gen(&paths, &cfg, prompter.as_ref()),
        Mode::PassReset => pass_reset(&paths, &cfg, prompter.as_ref()),
        Mode::Read(path) => read(&path, &cfg, prompter),
        Mode::Rotate => rotate(&cfg, prompter),
    }
}

fn credentials_file() -> Option<std::path::PathBuf> {
    CredentialStore::for_current_user(ConfigPaths::system().dropin_dir)
        .ok()
        .map(|store| store.credentials_file)
}

// ─────────────────────────────────────────────────────────────
// Rotation
// ─────────────────────────────────────────────────────────────

fn init_logging(cfg: &EffectiveConfig) -> Option<LogGuard> {
    match logging::init(&cfg.log_file, cfg.log_level) {
        Ok(guard) => {
            info!("global-logrotate v{VERSION} started");
            debug!("Log level: {}, Log file: {}", cfg.log_level, guard.path().display());
            Some(guard)
        }
        Err(err) => {
            eprintln!("Warning: Could not initialize logging: {err}");
            None
        }
    }
}

fn rotate(cfg: &EffectiveConfig, prompter: Arc<dyn Prompter>) -> Result<ExitCode> {
    // Held until the run is over; dropping it flushes the log file
    let _guard = init_logging(cfg);

    let resolver = PasswordResolver::standard(cfg, credentials_file(), prompter, ENCRYPT_PROMPT);
    match rotate_logs(cfg, &resolver) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(CoreError::PasswordNotConfigured) => {
            eprintln!("Error: {}", CoreError::PasswordNotConfigured);
            eprintln!();
            eprintln!("First-time setup required! Run:");
            eprintln!("  global-logrotate --pass-gen");
            eprintln!();
            eprintln!("Or to reset existing password:");
            eprintln!("  global-logrotate --pass-reset");
            error!("Encryption requested but no password configured");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            error!("{err}");
            Err(err.into())
        }
    }
}

// ─────────────────────────────────────────────────────────────
// --read
// ─────────────────────────────────────────────────────────────

fn read(path: &Path, cfg: &EffectiveConfig, prompter: Arc<dyn Prompter>) -> Result<ExitCode> {
    let resolver = PasswordResolver::standard(cfg, credentials_file(), prompter, DECRYPT_PROMPT);

    match read_archive(path, &resolver) {
        Ok(content) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&content)?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("Error reading file: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

// ─────────────────────────────────────────────────────────────
// --pass-gen / --pass-reset
// ─────────────────────────────────────────────────────────────

fn pass_gen(paths: &ConfigPaths, cfg: &EffectiveConfig, prompter: &dyn Prompter) -> Result<ExitCode> {
    println!("=== Global Logrotate - Password Setup ===");
    println!();

    let store = CredentialStore::for_current_user(&paths.dropin_dir)?;
    match setup_password(&store, prompter, cfg.encrypt_password_hash.as_deref())? {
        SetupOutcome::AlreadyConfigured => {
            println!("A password is already configured.");
            println!();
            println!("To change the existing password, use:");
            println!("  global-logrotate --pass-reset");
            println!();
        }
        SetupOutcome::Completed(change) => {
            warn_credentials(&change);
            println!();
            println!("╔══════════════════════════════════════════════════════════════════╗");
            println!("║                    PASSWORD SETUP COMPLETE                       ║");
            println!("╠══════════════════════════════════════════════════════════════════╣");
            println!("║  Password: {:<54} ║", change.masked);
            println!("╠══════════════════════════════════════════════════════════════════╣");
            println!("║  Password saved to credentials file. No need to enter it again. ║");
            println!("║  Keep your credentials file secure!                             ║");
            println!("╚══════════════════════════════════════════════════════════════════╝");
            println!();
            println!("Password stored in:");
            println!("  {}", change.credentials_file.display());
            println!();
            println!("Usage:");
            println!("  # Rotate with encryption (password auto-loaded from credentials):");
            println!("  global-logrotate --encrypt -D -p /var/log/apps");
            println!();
            println!("  # Read encrypted logs:");
            println!("  global-logrotate --read /path/to/file.gz.enc");
            println!();
            println!("Config saved to: {}", change.hash_file.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn pass_reset(
    paths: &ConfigPaths,
    cfg: &EffectiveConfig,
    prompter: &dyn Prompter,
) -> Result<ExitCode> {
    println!("=== Global Logrotate - Password Reset ===");
    println!();

    let store = CredentialStore::for_current_user(&paths.dropin_dir)?;
    match reset_password(&store, prompter, cfg.encrypt_password_hash.as_deref())? {
        ResetOutcome::NotConfigured => {
            println!("No existing password found. Use --pass-gen for initial setup.");
        }
        ResetOutcome::Completed(change) => {
            warn_credentials(&change);
            println!();
            println!("╔══════════════════════════════════════════════════════════════════╗");
            println!("║                    PASSWORD RESET COMPLETE                       ║");
            println!("╠══════════════════════════════════════════════════════════════════╣");
            println!("║  New Password: {:<50} ║", change.masked);
            println!("╠══════════════════════════════════════════════════════════════════╣");
            println!("║  WARNING: Previously encrypted files will still need the OLD    ║");
            println!("║  password to decrypt. Only new files will use this password.    ║");
            println!("║                                                                  ║");
            println!("║  Password saved to credentials file. No need to enter it again. ║");
            println!("╚══════════════════════════════════════════════════════════════════╝");
            println!();
            println!("Password stored in:");
            println!("  {}", change.credentials_file.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn warn_credentials(change: &PasswordChange) {
    if let Some(err) = &change.credentials_error {
        eprintln!("Warning: Could not save to credentials file: {err}");
    }
}
