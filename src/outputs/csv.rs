//! CSV persistence for extracted articles.
//!
//! The CSV file is the only link between the two pipeline stages: the
//! extractor writes it and the ranker loads it back.
//!
//! # Format
//!
//! ```text
//! Title,Publish Date,Meta Description,Canonical Link,Article Content,Yoast Schema Graph
//! ```
//!
//! UTF-8, CRLF line endings, fields quoted only when needed.

use crate::error::PipelineError;
use crate::models::{ArticleRecord, CSV_HEADER, CorpusTable};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Write `records` to `path`, header first.
///
/// The header is written even when there are no records.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = records.len()))]
pub fn write_records(path: &Path, records: &[ArticleRecord]) -> Result<(), PipelineError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_path(path)?;

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("Wrote CSV file");
    Ok(())
}

/// Load a previously extracted CSV as a corpus, keeping file order.
///
/// Empty cells and short rows load as empty strings; cells past the last
/// header are dropped.
///
/// # Errors
///
/// Returns [`PipelineError::MissingInput`] if `path` is not a file, or a
/// CSV error if the file cannot be parsed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_corpus(path: &Path) -> Result<CorpusTable, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::MissingInput { path: path.to_path_buf() });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for result in reader.records() {
        let mut record = result?;
        // Flexible rows may be ragged; square them up against the header.
        record.truncate(headers.len());
        while record.len() < headers.len() {
            record.push_field("");
        }
        rows.push(record.deserialize::<ArticleRecord>(Some(&headers))?);
    }

    info!(rows = rows.len(), "Loaded corpus");
    if let Some(first) = rows.first() {
        debug!(title = %first.title, "First corpus row");
    }
    Ok(CorpusTable::new(rows))
}
