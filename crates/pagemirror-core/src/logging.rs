//! Logging for capture runs.
//!
//! Records go to `$XDG_STATE_HOME/pagemirror/pagemirror.log` so console output
//! stays reserved for the capture summary. When the state directory cannot be
//! used, records go to stderr instead.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives (`RUST_LOG` syntax).
pub const LOG_ENV: &str = "PAGEMIRROR_LOG";

const LOG_FILE: &str = "pagemirror.log";
const DEFAULT_FILTER: &str = "info,pagemirror=debug,pagemirror_core=debug";

/// Where log records ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    Stderr,
}

/// Filter from `PAGEMIRROR_LOG`, then `RUST_LOG`, then the built-in default.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Path of the log file, creating the state directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("pagemirror")?;
    let state = dirs.get_state_home();
    fs::create_dir_all(&state)
        .with_context(|| format!("create state dir {}", state.display()))?;
    Ok(state.join(LOG_FILE))
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Installs the global subscriber writing to the capture log file.
///
/// Errors if the file cannot be opened or a subscriber is already installed.
pub fn init_file_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))?;

    tracing::info!(path = %path.display(), "pagemirror logging initialized");
    Ok(path)
}

/// Installs a stderr subscriber. A no-op if one is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// File logging if possible, stderr otherwise. Never fails.
pub fn init_logging() -> LogDestination {
    match init_file_logging() {
        Ok(path) => LogDestination::File(path),
        Err(err) => {
            init_logging_stderr();
            tracing::debug!("file logging unavailable: {:#}", err);
            LogDestination::Stderr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_valid() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn log_file_lives_under_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_STATE_HOME", dir.path());
        let path = log_file_path().unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.ends_with("pagemirror/pagemirror.log"));
        assert!(path.parent().unwrap().is_dir());
        let _ = open_log(&path).unwrap();
        assert!(path.is_file());
    }
}
