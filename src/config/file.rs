//! `KEY = value` files: the main config, its drop-ins and the credentials file

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{CONFIG_DROPIN_DIR, MAIN_CONFIG_FILE};

/// Where the layered configuration lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub main_file: PathBuf,
    pub dropin_dir: PathBuf,
}

impl ConfigPaths {
    pub fn system() -> Self {
        Self {
            main_file: PathBuf::from(MAIN_CONFIG_FILE),
            dropin_dir: PathBuf::from(CONFIG_DROPIN_DIR),
        }
    }

    /// `*.conf` drop-ins in apply order
    pub fn dropin_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.dropin_dir) else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "conf"))
            .collect();
        files.sort();
        files
    }
}

/// Parse one file's worth of lines, in file order
///
/// Blank lines and lines starting with `#` or `;` are ignored. A line needs
/// an `=` after at least one key character; one matching pair of surrounding
/// quotes is stripped from the value.
pub fn parse_pairs(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let idx = line.find('=')?;
            if idx == 0 {
                return None;
            }
            let key = line[..idx].trim();
            let value = unquote(line[idx + 1..].trim());
            Some((key.to_owned(), value.to_owned()))
        })
        .collect()
}

/// Remove one layer of `"..."` or `'...'`; anything else is returned as is
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

/// Merged raw values of every config layer; later layers win
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    values: HashMap<String, String>,
}

impl FileConfig {
    /// Main file first, then every drop-in in sorted order; missing files are skipped
    pub fn load(paths: &ConfigPaths) -> Self {
        let mut config = Self::default();
        config.merge_file(&paths.main_file);
        for dropin in paths.dropin_files() {
            config.merge_file(&dropin);
        }
        config
    }

    pub fn merge_file(&mut self, path: &Path) {
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!("Loaded config file {}", path.display());
                self.merge_str(&content);
            }
            Err(_) => debug!("Config file {} not readable, skipping", path.display()),
        }
    }

    pub fn merge_str(&mut self, content: &str) {
        self.values.extend(parse_pairs(content));
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Empty values count as unset
    pub fn get_str(&self, key: &str, default: &str) -> String {
        match self.raw(key) {
            Some(v) if !v.is_empty() => v.to_owned(),
            _ => default.to_owned(),
        }
    }

    pub fn get_opt(&self, key: &str) -> Option<String> {
        self.raw(key).filter(|v| !v.is_empty()).map(str::to_owned)
    }

    /// Signed, so `-1` reads as a number rather than as garbage
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.raw(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// A present key is true only for `true`, `yes` or `1`
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.raw(key) {
            Some(v) => matches!(v.to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs_skips_comments_and_strips_quotes() {
        let pairs = parse_pairs(
            "# comment\n; other\n\nLOG_DIR = \"/srv/logs\"\nPATTERN='*.txt'\n=orphan\nnoequals\nA=b=c\n",
        );
        assert_eq!(
            pairs,
            vec![
                ("LOG_DIR".to_owned(), "/srv/logs".to_owned()),
                ("PATTERN".to_owned(), "*.txt".to_owned()),
                ("A".to_owned(), "b=c".to_owned()),
            ]
        );
    }

    #[test]
    fn test_only_one_matching_quote_pair_is_stripped() {
        let pairs = parse_pairs(
            "A = \"\"x\"\"\nB = x'\nC = 'x'\nD = pass'word'\nE = \"mixed'\nF = \"\nG = ''\n",
        );
        let values: Vec<&str> = pairs.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, ["\"x\"", "x'", "x", "pass'word'", "\"mixed'", "\"", ""]);
    }

    #[test]
    fn test_typed_getters() {
        let mut cfg = FileConfig::default();
        cfg.merge_str("PARALLEL_JOBS = lots\nDRY_RUN = Yes\nENCRYPT = off\nPATTERN =\n");
        assert_eq!(cfg.get_int("PARALLEL_JOBS", 4), 4);
        cfg.merge_str("PARALLEL_JOBS = -1\n");
        assert_eq!(cfg.get_int("PARALLEL_JOBS", 4), -1);
        assert!(cfg.get_bool("DRY_RUN", false));
        assert!(!cfg.get_bool("ENCRYPT", true));
        assert!(cfg.get_bool("MISSING", true));
        assert_eq!(cfg.get_str("PATTERN", "*.log"), "*.log");
        assert_eq!(cfg.get_opt("PATTERN"), None);
    }
}
