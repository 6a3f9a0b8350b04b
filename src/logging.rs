//! Dual-output logging: a per-run timestamped file plus the console, each at
//! its own configured verbosity, with total-size retention on the log folder.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use walkdir::WalkDir;

use crate::config::LoggingSettings;

/// Guard that must be kept alive for the duration of the program.
/// Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber: one file layer, one console layer, each
/// filtered by its own level from the settings. Returns the flush guard and
/// runs folder-size retention when a budget is configured.
pub fn init(settings: &LoggingSettings, script_name: &str) -> Result<LoggingGuard> {
    let log_dir = PathBuf::from(&settings.logs_folder_name).join(script_name);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory \"{}\"", log_dir.display()))?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_path = log_dir.join(format!("{timestamp}_{script_name}_{}.log", hostname_string()));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file \"{}\"", log_path.display()))?;
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(settings.log_message_format.clone()))
        .with_filter(parse_level(&settings.file_logging_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(false)
        .with_timer(ChronoLocal::new(settings.log_message_format.clone()))
        .with_filter(parse_level(&settings.console_logging_level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!("Logging to \"{}\"", log_path.display());

    if let Some(max_bytes) = settings.max_folder_size {
        enforce_max_folder_size(&log_dir, max_bytes);
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Host name embedded in log file names and the run banner.
pub fn hostname_string() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown-host".to_string())
}

fn parse_level(level: &str) -> LevelFilter {
    // LevelFilter's FromStr is case-insensitive; unrecognized values keep
    // the default rather than aborting a run over a typo.
    level.parse().unwrap_or(LevelFilter::INFO)
}

/// Delete the oldest log files in `log_dir` until their total size fits the
/// budget. A file that fails to delete is warned about and counted as gone;
/// the next run sees the actual disk state.
pub fn enforce_max_folder_size(log_dir: &Path, max_bytes: u64) {
    let mut files: Vec<(PathBuf, u64, SystemTime)> = WalkDir::new(log_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".log"))
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            let mtime = meta.modified().ok()?;
            Some((entry.into_path(), meta.len(), mtime))
        })
        .collect();

    files.sort_by_key(|(_, _, mtime)| *mtime);

    let mut total: u64 = files.iter().map(|(_, size, _)| size).sum();
    let mut oldest_first = files.into_iter();
    while total > max_bytes {
        let Some((path, size, _)) = oldest_first.next() else {
            break;
        };
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Deleted \"{}\"", path.display()),
            Err(e) => tracing::warn!("Failed to delete \"{}\": {e}", path.display()),
        }
        total -= size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;

    fn touch(path: &Path, size: usize, mtime_secs: i64) {
        fs::write(path, vec![b'x'; size]).unwrap();
        filetime::set_file_mtime(path, FileTime::from_unix_time(mtime_secs, 0)).unwrap();
    }

    #[test]
    fn parse_level_is_case_insensitive_with_info_fallback() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level("WARN"), LevelFilter::WARN);
        assert_eq!(parse_level("Error"), LevelFilter::ERROR);
        assert_eq!(parse_level("not-a-level"), LevelFilter::INFO);
    }

    #[test]
    fn retention_deletes_oldest_until_under_budget() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("a.log");
        let mid = dir.path().join("b.log");
        let new = dir.path().join("c.log");
        touch(&old, 30, 1_000);
        touch(&mid, 20, 2_000);
        touch(&new, 10, 3_000);

        enforce_max_folder_size(dir.path(), 25);

        assert!(!old.exists());
        assert!(!mid.exists());
        assert!(new.exists());
    }

    #[test]
    fn retention_is_a_no_op_under_budget() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.log");
        let b = dir.path().join("b.log");
        touch(&a, 10, 1_000);
        touch(&b, 10, 2_000);

        enforce_max_folder_size(dir.path(), 25);

        assert!(a.exists());
        assert!(b.exists());
    }

    #[test]
    fn retention_only_touches_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("2024-01-01_run.log");
        let rotated = dir.path().join("2024-01-02_run.log.1");
        let other = dir.path().join("keep.txt");
        touch(&log, 50, 1_000);
        touch(&rotated, 50, 2_000);
        touch(&other, 500, 500);

        enforce_max_folder_size(dir.path(), 60);

        assert!(!log.exists());
        assert!(rotated.exists());
        assert!(other.exists());
    }
}
