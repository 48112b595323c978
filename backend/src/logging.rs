//! Log file setup.
//!
//! The binary calls [`init`] once at startup. Every run gets its own file,
//! `<log_dir>/app_YYYY-MM-DD_HH-MM-SS.log`. Library code only emits `tracing`
//! events and never installs a subscriber.
//!
//! The level is taken from `RUST_LOG` and defaults to `info`.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::LoggingError;

/// File name of the log for a run started at `started`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("app_{}.log", started.format("%Y-%m-%d_%H-%M-%S"))
}

/// Create the log file and install the global subscriber.
///
/// Returns the path of the file being written.
pub fn init(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(log_file_name(Local::now()));
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Logging initialized");
    Ok(path)
}
