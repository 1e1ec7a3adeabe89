//! Discovery & filter: find the files a run will rotate
//!
//! Matching uses glob semantics with `*` never crossing a `/`. The include
//! pattern is tested against the base name only; exclusion patterns are
//! tested against both the full path and the base name.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{CoreError, Result};

/// One file to rotate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub size: u64,
}

/// Compiled include pattern plus exclusions
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: GlobMatcher,
    exclude: GlobSet,
}

impl FileFilter {
    pub fn new(pattern: &str, excludes: &[String]) -> Result<Self> {
        let include = glob(pattern)?.compile_matcher();

        let mut builder = GlobSetBuilder::new();
        for pattern in excludes {
            builder.add(glob(pattern)?);
        }

        Ok(Self {
            include,
            exclude: builder.build()?,
        })
    }

    pub fn includes(&self, name: &str) -> bool {
        self.include.is_match(name)
    }

    pub fn excludes(&self, path: &Path, name: &str) -> bool {
        if self.exclude.is_match(path) {
            debug!("Excluding file (path match): {}", path.display());
            return true;
        }
        if self.exclude.is_match(name) {
            debug!("Excluding file (name match): {}", path.display());
            return true;
        }
        false
    }
}

fn glob(pattern: &str) -> Result<globset::Glob> {
    Ok(GlobBuilder::new(pattern).literal_separator(true).build()?)
}

/// Read exclusion patterns; blank lines and `#` comments are skipped
///
/// A missing file is a per-run configuration error.
pub fn load_exclude_patterns(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .map_err(|_| CoreError::MissingExcludeFile(path.to_path_buf()))?;

    info!("Loading exclude patterns from: {}", path.display());
    let patterns: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect();
    for pattern in &patterns {
        debug!("Exclude pattern: {pattern}");
    }
    Ok(patterns)
}

/// Walk `root` recursively and return matching files, smallest first
///
/// Unreadable entries are logged and skipped. An empty result is not an error.
pub fn find_log_files(root: &Path, filter: &FileFilter) -> Vec<Candidate> {
    debug!("Searching for files in {}", root.display());

    let mut files: Vec<Candidate> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Error accessing path: {err}");
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy();
            if !filter.includes(&name) || filter.excludes(entry.path(), &name) {
                return None;
            }
            let size = entry.metadata().ok()?.len();
            debug!("Found file: {} (size: {size})", entry.path().display());
            Some(Candidate {
                path: entry.path().to_path_buf(),
                size,
            })
        })
        .collect();

    // Small files first: they finish early while large ones are still in flight
    files.sort_by_key(|c| c.size);
    files
}

/// Exclusion file (if any) + walk, as one step
pub fn discover(root: &Path, pattern: &str, exclude_file: Option<&Path>) -> Result<Vec<Candidate>> {
    let excludes = match exclude_file {
        Some(path) => load_exclude_patterns(path)?,
        None => Vec::new(),
    };
    let filter = FileFilter::new(pattern, &excludes)?;
    Ok(find_log_files(root, &filter))
}
