use crate::config::file::FileConfig;
use crate::consts::*;

pub const KEY_LOG_DIR: &str = "LOG_DIR";
pub const KEY_PATTERN: &str = "PATTERN";
pub const KEY_PARALLEL_JOBS: &str = "PARALLEL_JOBS";
pub const KEY_OLD_LOGS_DIR: &str = "OLD_LOGS_DIR";
pub const KEY_EXCLUDE_FILE: &str = "EXCLUDE_FILE";
pub const KEY_DATE_FORMAT: &str = "DATE_FORMAT";
pub const KEY_DRY_RUN: &str = "DRY_RUN";
pub const KEY_ENCRYPT: &str = "ENCRYPT";
pub const KEY_ENCRYPT_PASSWORD: &str = "ENCRYPT_PASSWORD";
pub const KEY_ENCRYPT_PASSWORD_HASH: &str = "ENCRYPT_PASSWORD_HASH";
pub const KEY_LOG_FILE: &str = "LOG_FILE";
pub const KEY_LOG_LEVEL: &str = "LOG_LEVEL";

pub fn default_log_dir(file: &FileConfig) -> String {
    file.get_str(KEY_LOG_DIR, DEFAULT_LOG_DIR)
}

pub fn default_pattern(file: &FileConfig) -> String {
    file.get_str(KEY_PATTERN, DEFAULT_PATTERN)
}

/// Zero and negative values clamp to 1, i.e. sequential
pub fn default_parallel_jobs(file: &FileConfig) -> usize {
    let jobs = file.get_int(KEY_PARALLEL_JOBS, DEFAULT_PARALLEL_JOBS as i64);
    usize::try_from(jobs).unwrap_or(1).max(1)
}

pub fn default_date_format(file: &FileConfig) -> String {
    file.get_str(KEY_DATE_FORMAT, DEFAULT_DATE_FORMAT)
}

pub fn default_log_file(file: &FileConfig) -> String {
    file.get_str(KEY_LOG_FILE, DEFAULT_LOG_FILE)
}

pub fn default_log_level(file: &FileConfig) -> String {
    file.get_str(KEY_LOG_LEVEL, DEFAULT_LOG_LEVEL)
}
