// src/logging.rs
//! File logging. The terminal belongs to the meter, so everything goes to a file.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Default log location, `<data dir>/vumz/vumz.log`.
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("vumz")
        .join("vumz.log")
}

/// Install the global subscriber writing to `path` (or the default location).
/// Filtering follows `RUST_LOG`, falling back to `info`.
pub fn init(path: Option<&Path>) -> Result<PathBuf> {
    let log_path = path.map_or_else(default_log_path, Path::to_path_buf);
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("could not open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_thread_names(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_under_vumz() {
        assert!(default_log_path().ends_with("vumz/vumz.log"));
    }
}
