//! The extraction stage: link list in, timestamped CSV out.
//!
//! # Pipeline
//!
//! 1. Read `<link_dir>/<file>`, one URL per line
//! 2. Drop URLs that match no known [`Site`]
//! 3. Fetch and extract the rest, a bounded number at a time
//! 4. Write `<output_dir>/<stem>-<unix_ts>.csv` in link-list order
//!
//! A page that cannot be fetched still produces a row: the site's
//! placeholder record. Nothing about individual failures reaches the caller
//! beyond the log.

use crate::config::Settings;
use crate::error::PipelineError;
use crate::fetch::Fetch;
use crate::models::{ArticleRecord, ExtractSummary};
use crate::outputs::csv::write_records;
use crate::scrapers::Site;
use crate::utils::{
    csv_file_name, ensure_writable_dir, resolve_in, truncate_for_log, unix_timestamp,
};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::{debug, error, info, instrument};

/// Outcome of extracting one recognized URL.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Extracted(ArticleRecord),
    Failed { site: Site, url: String, reason: String },
}

impl Extraction {
    /// The row written to the CSV for this URL.
    pub fn into_record(self) -> ArticleRecord {
        match self {
            Extraction::Extracted(record) => record,
            Extraction::Failed { site, .. } => site.placeholders(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Extraction::Failed { .. })
    }
}

/// Runs the extraction stage with an injected page fetcher.
#[derive(Debug)]
pub struct Extractor<F> {
    fetcher: F,
    settings: Settings,
}

impl<F> Extractor<F>
where
    F: Fetch + Sync,
{
    /// Create an extractor.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Page source, usually a retrying [`crate::fetch::HttpFetcher`]
    /// * `settings` - Directories and concurrency for the stage
    pub fn new(fetcher: F, settings: Settings) -> Self {
        Self { fetcher, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Extract every URL listed in `<link_dir>/<file>` and write the CSV.
    ///
    /// The output directory is created and checked before anything is
    /// fetched.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, file: &str) -> Result<ExtractSummary, PipelineError> {
        let link_path = resolve_in(&self.settings.link_dir, file)?;
        let urls = read_links(&link_path).await?;
        ensure_writable_dir(&self.settings.output_dir).await?;

        let records = self.extract_all(urls).await;

        let file_name = csv_file_name(file, unix_timestamp());
        let csv_path = self.settings.output_dir.join(&file_name);
        write_records(&csv_path, &records)?;

        info!(file_name = %file_name, rows = records.len(), "Data extraction and storage complete");
        Ok(ExtractSummary::completed(file_name))
    }

    /// Extract recognized URLs, returning one record per URL in input order.
    #[instrument(level = "info", skip_all, fields(urls = urls.len()))]
    pub async fn extract_all(&self, urls: Vec<String>) -> Vec<ArticleRecord> {
        let total = urls.len();
        let targets: Vec<(Site, String)> = urls
            .into_iter()
            .filter_map(|url| match Site::detect(&url) {
                Some(site) => Some((site, url)),
                None => {
                    debug!(%url, "Skipping unrecognized URL");
                    None
                }
            })
            .collect();
        let skipped = total - targets.len();

        // `buffered` keeps output in input order while fetching concurrently.
        let pending: Vec<_> = targets
            .into_iter()
            .map(|(site, url)| self.extract_one(site, url))
            .collect();
        let extractions: Vec<Extraction> = stream::iter(pending)
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let failed = extractions.iter().filter(|e| e.is_failed()).count();
        for extraction in &extractions {
            if let Extraction::Failed { site, url, reason } = extraction {
                debug!(%site, %url, %reason, "Placeholder row written");
            }
        }
        info!(
            total,
            skipped,
            extracted = extractions.len() - failed,
            failed,
            "Extraction batch finished"
        );
        extractions.into_iter().map(Extraction::into_record).collect()
    }

    /// Fetch and extract a single URL for a known site.
    #[instrument(level = "info", skip(self, site), fields(%site))]
    pub async fn extract_one(&self, site: Site, url: String) -> Extraction {
        match self.fetcher.fetch(&url, site.user_agent()).await {
            Ok(body) => {
                debug!(bytes = body.len(), head = %truncate_for_log(&body, 120), "Fetched page");
                let record = site.extract(&body);
                debug!(title = %record.title, "Extracted article");
                Extraction::Extracted(record)
            }
            Err(e) => {
                error!(%url, error = %e, "Error processing URL; writing placeholder row");
                Extraction::Failed {
                    site,
                    url,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Read a newline-separated link list, trimming each line.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_links(path: &Path) -> Result<Vec<String>, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::MissingInput { path: path.to_path_buf() });
    }
    let raw = tokio::fs::read_to_string(path).await?;
    let links: Vec<String> = raw.lines().map(|line| line.trim().to_string()).collect();
    info!(count = links.len(), "Read link list");
    Ok(links)
}
