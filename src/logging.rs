//! Log file sink: `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`, appended
//!
//! `init` installs a global tracing subscriber writing to a shared,
//! mutex-guarded file handle and returns a [`LogGuard`]. Keep the guard alive
//! for the whole run; dropping it flushes and syncs the file.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

use crate::consts::LOG_TIMESTAMP_FORMAT;
use crate::enums::LogLevel;
use crate::error::Result;

/// Event format matching the historical log layout
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketFormat;

impl<S, N> FormatEvent<S, N> for BracketFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "[{}] [{}] ",
            Local::now().format(LOG_TIMESTAMP_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log file shared by every worker thread
#[derive(Debug, Clone)]
pub struct SharedLogFile(Arc<Mutex<File>>);

impl SharedLogFile {
    fn lock(&self) -> MutexGuard<'_, File> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct SharedLogWriter<'a>(MutexGuard<'a, File>);

impl Write for SharedLogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedLogFile {
    type Writer = SharedLogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SharedLogWriter(self.lock())
    }
}

/// Flushes the log file when dropped
#[derive(Debug)]
pub struct LogGuard {
    file: SharedLogFile,
    path: PathBuf,
}

impl LogGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        let mut file = self.file.lock();
        let _ = file.flush();
        let _ = file.sync_all();
    }
}

/// Open `path` for appending, creating its directory if needed
pub fn open_log_file(path: &Path) -> Result<SharedLogFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::DirBuilder::new()
            .recursive(true)
            .mode(0o755)
            .create(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o644)
        .open(path)?;
    Ok(SharedLogFile(Arc::new(Mutex::new(file))))
}

/// Install the process-wide subscriber; call once, at startup
pub fn init(path: &Path, level: LogLevel) -> Result<LogGuard> {
    let file = open_log_file(path)?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(level.as_level_filter())
        .event_format(BracketFormat)
        .with_writer(file.clone())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(LogGuard {
        file,
        path: path.to_path_buf(),
    })
}
