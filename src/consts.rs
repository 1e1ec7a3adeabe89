// src/consts.rs
//! Shared constants: archive format parameters, defaults and well-known paths

/// Crate version, reported in the startup log line and `--version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header magic for encrypted archives ("Global LogRotate Encrypted")
pub const ENCRYPT_MAGIC: &[u8; 4] = b"GLRE";

/// Random salt stored in every envelope
pub const SALT_SIZE: usize = 32;

/// AES-GCM nonce stored in every envelope
pub const NONCE_SIZE: usize = 12;

/// AES-256 key length
pub const KEY_SIZE: usize = 32;

/// GCM authentication tag appended to the ciphertext
pub const TAG_SIZE: usize = 16;

/// PBKDF2-HMAC-SHA256 rounds: part of the on-disk format, never change
pub const KDF_ITERATIONS: u32 = 100_000;

/// Fixed envelope header: magic + salt + nonce
pub const HEADER_SIZE: usize = ENCRYPT_MAGIC.len() + SALT_SIZE + NONCE_SIZE;

/// Smallest byte length a well-formed envelope can have
pub const MIN_ENVELOPE_SIZE: usize = HEADER_SIZE + TAG_SIZE;

pub const DEFAULT_LOG_DIR: &str = "/var/log/apps";
pub const DEFAULT_PATTERN: &str = "*.log";
pub const DEFAULT_PARALLEL_JOBS: usize = 4;
pub const DEFAULT_DATE_FORMAT: &str = "date";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Name of the per-day archive root created next to rotated files
pub const OLD_LOGS_DIR_NAME: &str = "old_logs";

pub const MAIN_CONFIG_FILE: &str = "/etc/global-sys-utils/global.conf";
pub const CONFIG_DROPIN_DIR: &str = "/etc/global-sys-utils/global.conf.d";
pub const DEFAULT_LOG_FILE: &str = "/var/log/global-sys-utils/global-logrotate.log";

/// Drop-in written by the password setup flow
pub const ENCRYPTION_DROPIN_FILE: &str = "encryption.conf";

/// Credentials file, relative to the invoking user's home directory
pub const CREDENTIALS_RELATIVE_PATH: &str = ".global-sys-utils/config/credentials.ini";

/// Environment variable carrying a candidate password
pub const PASSWORD_ENV_VAR: &str = "LOGROTATE_PASSWORD";

/// Keys accepted inside the credentials file
pub const CREDENTIALS_KEYS: [&str; 2] = ["LOGROTATE_PASSWORD", "password"];

/// Length of passwords produced by `--pass-gen`
pub const GENERATED_PASSWORD_LEN: usize = 24;

/// Minimum length of a user-chosen password
pub const MIN_PASSWORD_LEN: usize = 8;

/// Alphabet for generated passwords
pub const PASSWORD_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Archive day directory format
pub const ARCHIVE_DAY_FORMAT: &str = "%Y%m%d";

/// Suffix formats for `-D` and `-H`
pub const DATE_ONLY_FORMAT: &str = "%Y%m%d";
pub const FULL_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// Timestamp format of the log file lines
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp prefix of human-readable stdout lines
pub const CONSOLE_TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Z %Y";
