//! # Blog Similarity
//!
//! A two-stage content pipeline for real-estate blog articles. The first
//! stage scrapes articles into a CSV file; the second finds the articles in
//! such a file that are textually similar to a topic.
//!
//! ## Features
//!
//! - Scrapes Bayut (MyBayut) and Property Finder blog posts
//! - Retries transient HTTP failures with exponential backoff
//! - Ranks articles by TF-IDF cosine similarity of title and meta description
//! - Runs as a one-shot CLI or as a small HTTP service
//!
//! ## Usage
//!
//! ```sh
//! blog_similarity extract dubai.txt
//! blog_similarity rank dubai-1700000000.csv "living in dubai marina"
//! blog_similarity serve
//! ```
//!
//! ## Architecture
//!
//! The stages only share the CSV file on disk:
//! 1. **Extract**: `LinkFiles/<file>` → fetch + per-site extraction → `BlogsData/<stem>-<ts>.csv`
//! 2. **Rank**: `BlogsData/<file>` + topic → normalize → TF-IDF → cosine → threshold + dedup → JSON

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod fetch;
mod models;
mod outputs;
mod ranker;
mod scrapers;
mod server;
mod utils;

use cli::{Cli, Command};
use extract::Extractor;
use fetch::build_fetcher;
use ranker::Ranker;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr; stdout carries only the JSON payload.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let settings = args.settings()?;
    debug!(?settings, "Resolved settings");

    match args.command {
        Command::Extract { file } => {
            info!(%file, "Starting extraction");
            let extractor = Extractor::new(build_fetcher(&settings)?, settings);
            let summary = extractor.run(&file).await?;
            println!("{}", serde_json::to_string(&summary)?);
        }
        Command::Rank { file, topic } => {
            let ranker = Ranker::from_settings(&settings);
            info!(%file, %topic, threshold = ranker.threshold(), "Starting similarity ranking");
            let response =
                ranker.rank_file(&settings.output_dir, &file, &topic, settings.always_array)?;
            info!(matches = response.len(), "Ranking finished");
            println!("{}", serde_json::to_string(&response)?);
        }
        Command::Serve { .. } => {
            server::serve(settings).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
