//! Unified logging for the shell and the hosted content.
//!
//! `env_logger` formats records from the `log` facade and writes them to a
//! daily file in the app log directory, with size-based rotation and cleanup.
//! Content logs arrive through `write_log`/`write_logs` and go through the
//! same facade.

use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tauri::{command, AppHandle, Manager};

use crate::error::{ResultExt, ShellResult};

/// Maximum log file size before rotation (5MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
const MAX_LOG_FILES: usize = 5;

const LOG_PREFIX: &str = "mutiny";

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,mutiny_desktop_lib=debug";

/// Initialize the logging system
pub fn init_logging(app: &AppHandle) -> ShellResult<()> {
    let log_dir = app.path().app_log_dir().context("Failed to get log directory")?;
    fs::create_dir_all(&log_dir)?;

    let writer = RotatingFile::open(log_dir.clone(), MAX_LOG_SIZE)?;

    Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(writer)))
        .try_init()
        .context("Logger already initialised")?;

    log::info!("Logging system initialized");
    log::info!("Log directory: {:?}", log_dir);
    Ok(())
}

/// Get the path for the current log file (one per day)
fn current_log_path(log_dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    log_dir.join(format!("{}_{}.log", LOG_PREFIX, date))
}

/// Clean up old log files, keeping only the most recent MAX_LOG_FILES
fn cleanup_old_logs(log_dir: &Path) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "log"))
        .collect();

    // Sort by modification time (newest first)
    log_files.sort_by(|a, b| {
        let a_time = a.metadata().and_then(|m| m.modified()).ok();
        let b_time = b.metadata().and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time)
    });

    for file in log_files.into_iter().skip(MAX_LOG_FILES) {
        let _ = fs::remove_file(file.path());
    }
}

/// Append-only daily log file that rotates once it grows past `max_size`.
struct RotatingFile {
    dir: PathBuf,
    path: PathBuf,
    file: File,
    size: u64,
    max_size: u64,
}

impl RotatingFile {
    fn open(dir: PathBuf, max_size: u64) -> io::Result<Self> {
        let path = current_log_path(&dir);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();
        cleanup_old_logs(&dir);

        Ok(Self {
            dir,
            path,
            file,
            size,
            max_size,
        })
    }

    /// Move to a new file on day change or when the current one is full.
    fn roll_if_needed(&mut self) -> io::Result<()> {
        let today = current_log_path(&self.dir);
        if today == self.path && self.size <= self.max_size {
            return Ok(());
        }

        if today == self.path {
            let timestamp = Local::now().format("%Y-%m-%d_%H%M%S%.3f");
            let rotated = self.dir.join(format!("{}_{}.log", LOG_PREFIX, timestamp));
            fs::rename(&self.path, rotated)?;
        }

        self.file = OpenOptions::new().create(true).append(true).open(&today)?;
        self.size = self.file.metadata()?.len();
        self.path = today;
        cleanup_old_logs(&self.dir);
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.roll_if_needed()?;
        let written = self.file.write(buf)?;
        self.size += written as u64;

        // Also print to console in debug builds
        #[cfg(debug_assertions)]
        let _ = io::stderr().write_all(&buf[..written]);

        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn parse_level(level: &str) -> log::Level {
    match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" | "warning" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    }
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Write a log message from the content
#[command]
pub fn write_log(level: String, source: String, message: String) {
    log::log!(target: "content", parse_level(&level), "[{}] {}", source, message);
}

/// Write multiple log messages from the content (batch)
#[command]
pub fn write_logs(logs: Vec<(String, String, String)>) {
    for (level, source, message) in logs {
        write_log(level, source, message);
    }
}

/// Get the log directory path
#[command]
pub fn get_log_dir(app: AppHandle) -> ShellResult<String> {
    let log_dir = app.path().app_log_dir().context("Failed to get log directory")?;

    Ok(log_dir.to_string_lossy().to_string())
}
