//! Command-line interface definitions.
//!
//! Global options override values from the optional YAML settings file.
//! Most options can also be provided through environment variables.

use crate::config::Settings;
use crate::error::PipelineError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the blog similarity pipeline.
///
/// # Examples
///
/// ```sh
/// # Scrape LinkFiles/dubai.txt into BlogsData/dubai-<timestamp>.csv
/// blog_similarity extract dubai.txt
///
/// # Rank a previously extracted CSV against a topic
/// blog_similarity rank dubai-1700000000.csv "living in dubai marina"
///
/// # Serve both operations over HTTP
/// blog_similarity serve --bind 0.0.0.0:8000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Optional path to a YAML settings file
    #[arg(short, long, global = true, env = "BLOG_SIMILARITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding URL list files
    #[arg(long, global = true, env = "BLOG_SIMILARITY_LINK_DIR")]
    pub link_dir: Option<PathBuf>,

    /// Directory for extracted CSV files
    #[arg(short, long, global = true, env = "BLOG_SIMILARITY_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Similarity a row must exceed to match
    #[arg(short, long, global = true)]
    pub threshold: Option<f64>,

    /// Pages fetched concurrently during extraction
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Return rank results as an array even for zero or one match
    #[arg(long, global = true)]
    pub always_array: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Scrape every URL in a link list file into a timestamped CSV
    Extract {
        /// File name inside the link directory
        file: String,
    },
    /// Rank an extracted CSV against a topic
    Rank {
        /// CSV file name inside the output directory
        file: String,
        /// Topic text to compare against
        topic: String,
    },
    /// Serve extract and rank over HTTP
    Serve {
        /// Address to bind (host:port)
        #[arg(long, env = "BLOG_SIMILARITY_BIND")]
        bind: Option<String>,
    },
}

impl Cli {
    /// Merge defaults, the settings file and command-line overrides.
    pub fn settings(&self) -> Result<Settings, PipelineError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(dir) = &self.link_dir {
            settings.link_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(threshold) = self.threshold {
            settings.threshold = threshold;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if self.always_array {
            settings.always_array = true;
        }
        if let Command::Serve { bind: Some(bind) } = &self.command {
            settings.bind = bind.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}
