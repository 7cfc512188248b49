//! Runtime settings for both pipeline stages.
//!
//! Settings come from three layers, lowest priority first: built-in defaults,
//! an optional YAML file (`--config`), and command-line flags.
//!
//! ```yaml
//! link_dir: LinkFiles
//! output_dir: BlogsData
//! threshold: 0.5
//! concurrency: 4
//! max_retries: 5
//! backoff_base_ms: 300
//! extra_stopwords: [dubai, uae]
//! ```

use crate::error::PipelineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// Similarity cutoff used when nothing else is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding newline-separated URL lists.
    pub link_dir: PathBuf,
    /// Directory receiving extracted CSV files, and read back by the ranker.
    pub output_dir: PathBuf,
    /// Rows must score strictly above this to match.
    pub threshold: f64,
    /// Maximum pages fetched at once.
    pub concurrency: usize,
    /// Retries for transient fetch failures, on top of the first attempt.
    pub max_retries: usize,
    pub backoff_base_ms: u64,
    pub max_backoff_secs: u64,
    pub request_timeout_secs: u64,
    /// Words ignored by the ranker in addition to the English stopword list.
    pub extra_stopwords: Vec<String>,
    /// Always answer rank requests with a JSON array.
    pub always_array: bool,
    /// Listen address for `serve`.
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            link_dir: PathBuf::from("LinkFiles"),
            output_dir: PathBuf::from("BlogsData"),
            threshold: DEFAULT_THRESHOLD,
            concurrency: 4,
            max_retries: 5,
            backoff_base_ms: 300,
            max_backoff_secs: 30,
            request_timeout_secs: 30,
            extra_stopwords: Vec::new(),
            always_array: false,
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file; missing keys keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::MissingInput { path: path.to_path_buf() });
        }
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&raw)?;
        info!("Loaded settings file");
        Ok(settings)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(PipelineError::InvalidConfig(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.concurrency == 0 {
            return Err(PipelineError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay before the first retry of a transient fetch failure.
    ///
    /// Later retries double it, up to [`Settings::max_backoff`].
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    /// Upper bound on a single retry delay, before jitter.
    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }

    /// Whole-request timeout applied by the HTTP client.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.threshold, 0.5);
        assert_eq!(settings.link_dir, PathBuf::from("LinkFiles"));
        assert_eq!(settings.output_dir, PathBuf::from("BlogsData"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "threshold: 0.3\nconcurrency: 2").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.threshold, 0.3);
        assert_eq!(settings.concurrency, 2);
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.output_dir, PathBuf::from("BlogsData"));
    }

    #[test]
    fn test_missing_settings_file() {
        let err = Settings::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.threshold = 1.5;
        assert!(matches!(settings.validate(), Err(PipelineError::InvalidConfig(_))));

        let mut settings = Settings::default();
        settings.concurrency = 0;
        assert!(settings.validate().is_err());
    }
}
