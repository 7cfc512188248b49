//! Utility functions for file naming, path handling and logging.
//!
//! - Resolving caller-supplied file names inside the configured directories
//! - Naming timestamped CSV outputs
//! - Output directory validation
//! - String truncation for log fields

use crate::error::PipelineError;
use chrono::Utc;
use std::fs as stdfs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Resolve a caller-supplied file name inside `dir`.
///
/// Only the final path component is used, so `../secrets` resolves to
/// `dir/secrets`. A name with no usable component is reported as missing.
pub fn resolve_in(dir: &Path, file: &str) -> Result<PathBuf, PipelineError> {
    Path::new(file)
        .file_name()
        .map(|name| dir.join(name))
        .ok_or_else(|| PipelineError::MissingInput { path: dir.join(file) })
}

/// Name of the CSV produced for a link list: `<stem>-<unix_timestamp>.csv`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(csv_file_name("links.txt", 1700000000), "links-1700000000.csv");
/// ```
pub fn csv_file_name(link_file: &str, timestamp: i64) -> String {
    let stem = Path::new(link_file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(link_file);
    format!("{stem}-{timestamp}.csv")
}

/// Current Unix time in whole seconds.
pub fn unix_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary before `max` bytes
/// and get a `"…(+N bytes)"` suffix.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(path).await?;
    // Sync write keeps the error surface simple.
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
