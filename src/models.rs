//! Data models shared by the extractor and the ranker.
//!
//! - [`ArticleRecord`]: one scraped article, one CSV row
//! - [`CorpusTable`]: the ordered rows of one CSV file
//! - [`SimilarityResult`]: a corpus row that matched a topic
//! - [`RankResponse`]: the wire shape returned for a rank request
//! - [`ExtractSummary`]: the confirmation returned for an extract request
//!
//! Field names are renamed to the CSV column headers, which double as the
//! JSON keys at the boundary.

use serde::{Deserialize, Serialize};

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 6] = [
    "Title",
    "Publish Date",
    "Meta Description",
    "Canonical Link",
    "Article Content",
    "Yoast Schema Graph",
];

/// Strings the site extractors emit when a field is missing.
///
/// The two sites disagree ("no title" vs "N/A"); both forms are kept in the
/// CSV and both count as empty text when ranking.
pub const PLACEHOLDERS: [&str; 7] = [
    "N/A",
    "no title",
    "no date",
    "no description",
    "no link",
    "no content",
    "no schema graph",
];

/// Whether a field value carries no information for ranking.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || PLACEHOLDERS.contains(&trimmed)
}

/// One article as scraped from a blog page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ArticleRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Publish Date")]
    pub publish_date: String,
    #[serde(rename = "Meta Description")]
    pub meta_description: String,
    #[serde(rename = "Canonical Link")]
    pub canonical_link: String,
    #[serde(rename = "Article Content")]
    pub article_content: String,
    #[serde(rename = "Yoast Schema Graph")]
    pub yoast_schema_graph: String,
}

impl ArticleRecord {
    /// A record with every field set to `placeholder`.
    pub fn filled_with(placeholder: &str) -> Self {
        Self {
            title: placeholder.to_string(),
            publish_date: placeholder.to_string(),
            meta_description: placeholder.to_string(),
            canonical_link: placeholder.to_string(),
            article_content: placeholder.to_string(),
            yoast_schema_graph: placeholder.to_string(),
        }
    }

    /// Title text used for ranking, or `None` for a placeholder.
    pub fn informative_title(&self) -> Option<&str> {
        Some(self.title.as_str()).filter(|t| !is_placeholder(t))
    }

    /// Meta description used for ranking, or `None` for a placeholder.
    pub fn informative_description(&self) -> Option<&str> {
        Some(self.meta_description.as_str()).filter(|d| !is_placeholder(d))
    }
}

/// Rows of one extracted CSV file, in file order.
///
/// Row order is the tie-break order for equal similarity scores and decides
/// which row survives title deduplication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusTable {
    pub rows: Vec<ArticleRecord>,
}

impl CorpusTable {
    pub fn new(rows: Vec<ArticleRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A corpus row that scored above the threshold for a topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    #[serde(rename = "Topic")]
    pub topic: String,
    /// Cosine similarity in `[0, 1]`.
    #[serde(rename = "Similarity")]
    pub similarity: f64,
    #[serde(rename = "Similar Title")]
    pub similar_title: String,
    /// The original row, re-emitted with its literal placeholder strings.
    #[serde(flatten)]
    pub record: ArticleRecord,
    #[serde(rename = "Processed_Text")]
    pub processed_text: String,
}

/// JSON shape of a rank response.
///
/// No match serializes as `{}`, exactly one match as a bare object and
/// several matches as an array. With `always_array` every response is an
/// array instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RankResponse {
    Empty {},
    Single(SimilarityResult),
    Many(Vec<SimilarityResult>),
}

impl RankResponse {
    pub fn from_results(mut results: Vec<SimilarityResult>, always_array: bool) -> Self {
        if always_array {
            return RankResponse::Many(results);
        }
        match results.len() {
            0 => RankResponse::Empty {},
            1 => RankResponse::Single(results.remove(0)),
            _ => RankResponse::Many(results),
        }
    }

    /// Number of matches carried by this response.
    pub fn len(&self) -> usize {
        match self {
            RankResponse::Empty {} => 0,
            RankResponse::Single(_) => 1,
            RankResponse::Many(v) => v.len(),
        }
    }
}

/// Confirmation returned once an extracted CSV has been written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractSummary {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
}

impl ExtractSummary {
    pub fn completed(file_name: impl Into<String>) -> Self {
        Self {
            message: "Data extraction and storage complete.".to_string(),
            file_name: file_name.into(),
        }
    }
}
