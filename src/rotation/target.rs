use std::path::{Path, PathBuf};

use crate::config::EffectiveConfig;
use crate::enums::ArchiveKind;

/// Where a file's archive lands: `<old-logs-root>/<YYYYMMDD>/<name>.<suffix>.gz[.enc]`
///
/// The existence of `path` is the whole idempotence check. It is a plain
/// stat, not a lock: one rotation process per log directory is assumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTarget {
    pub dir: PathBuf,
    pub path: PathBuf,
}

impl ArchiveTarget {
    pub fn for_file(source: &Path, cfg: &EffectiveConfig) -> Self {
        let file_dir = source.parent().unwrap_or_else(|| Path::new("."));
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let dir = cfg.archive_root(file_dir).join(&cfg.archive_day);
        let path = dir.join(format!(
            "{name}.{}{}",
            cfg.date_suffix,
            ArchiveKind::rotated_extension(cfg.encrypt)
        ));
        Self { dir, path }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
