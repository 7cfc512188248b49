//! The ranking stage: find corpus articles similar to a topic.
//!
//! # Pipeline
//!
//! 1. Load the CSV produced by the extractor ([`crate::outputs::csv::load_corpus`])
//! 2. Normalize `Title + " " + Meta Description` per row ([`normalize`])
//! 3. Fit a TF-IDF space over those rows and map the topic into it ([`vectorize`])
//! 4. Keep rows whose cosine similarity beats the threshold, one per title ([`score`])
//!
//! Placeholder field values such as `"N/A"` or `"no title"` count as empty text
//! in step 2 but are returned unchanged in the results.

pub mod normalize;
pub mod score;
pub mod vectorize;

use crate::config::{DEFAULT_THRESHOLD, Settings};
use crate::error::PipelineError;
use crate::models::{ArticleRecord, CorpusTable, RankResponse, SimilarityResult};
use crate::outputs::csv::load_corpus;
use crate::utils::resolve_in;
use normalize::Normalizer;
use std::path::Path;
use tracing::{debug, info, instrument};
use vectorize::TfIdfVectorizer;

/// Scores a corpus against one topic at a time.
#[derive(Debug, Clone)]
pub struct Ranker {
    normalizer: Normalizer,
    threshold: f64,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(Normalizer::default(), DEFAULT_THRESHOLD)
    }
}

impl Ranker {
    /// Create a ranker.
    ///
    /// # Arguments
    ///
    /// * `normalizer` - Text normalizer applied to both rows and topics
    /// * `threshold` - Similarity a row must strictly exceed to be returned
    pub fn new(normalizer: Normalizer, threshold: f64) -> Self {
        Self { normalizer, threshold }
    }

    /// Ranker for the configured threshold and extra stopwords.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Normalizer::with_extra_stopwords(&settings.extra_stopwords),
            settings.threshold,
        )
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Normalized ranking text for one row.
    pub fn processed_text(&self, record: &ArticleRecord) -> String {
        let title = record.informative_title().unwrap_or("");
        let description = record.informative_description().unwrap_or("");
        let joined = format!("{title} {description}");
        self.normalizer.normalize(Some(joined.as_str()))
    }

    /// Rank every row of `corpus` against `topic`.
    ///
    /// Results keep corpus order. An empty corpus, or a topic sharing no terms
    /// with it, yields no results.
    #[instrument(level = "info", skip(self, corpus), fields(rows = corpus.len()))]
    pub fn rank(&self, corpus: &CorpusTable, topic: &str) -> Vec<SimilarityResult> {
        if corpus.is_empty() {
            info!("Empty corpus; nothing to rank");
            return Vec::new();
        }

        let processed: Vec<String> = corpus.rows.iter().map(|r| self.processed_text(r)).collect();
        let (vectorizer, matrix) = TfIdfVectorizer::fit_transform(&processed);
        debug!(vocabulary = vectorizer.vocabulary_len(), "Fitted TF-IDF space");
        if vectorizer.is_empty() {
            info!("Corpus has no usable terms; every row scores 0");
        }

        let query_text = self.normalizer.normalize(Some(topic));
        let query = vectorizer.transform(&query_text);
        debug!(%query_text, terms = query.len(), "Vectorized topic");
        let unseen: Vec<&str> = query_text
            .split_whitespace()
            .filter(|term| vectorizer.idf(term).is_none())
            .collect();
        if !unseen.is_empty() {
            debug!(?unseen, "Topic terms absent from corpus vocabulary");
        }

        let scores = score::similarities(&query, &matrix);
        let selected = score::select(&scores, &corpus.rows, self.threshold);
        info!(
            matches = selected.len(),
            threshold = self.threshold(),
            "Similarity ranking complete"
        );

        selected
            .into_iter()
            .map(|(i, similarity)| {
                let record = corpus.rows[i].clone();
                SimilarityResult {
                    topic: topic.to_string(),
                    similarity,
                    similar_title: record.title.clone(),
                    processed_text: processed[i].clone(),
                    record,
                }
            })
            .collect()
    }

    /// Load `<corpus_dir>/<file>` and rank it against `topic`.
    #[instrument(level = "info", skip(self, corpus_dir))]
    pub fn rank_file(
        &self,
        corpus_dir: &Path,
        file: &str,
        topic: &str,
        always_array: bool,
    ) -> Result<RankResponse, PipelineError> {
        let path = resolve_in(corpus_dir, file)?;
        let corpus = load_corpus(&path)?;
        let results = self.rank(&corpus, topic);
        Ok(RankResponse::from_results(results, always_array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::csv::write_records;

    fn row(title: &str, description: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            publish_date: "May 6, 2025".to_string(),
            meta_description: description.to_string(),
            canonical_link: format!("https://www.bayut.com/mybayut/{}/", title.len()),
            article_content: "body".to_string(),
            yoast_schema_graph: "{}".to_string(),
        }
    }

    fn corpus(rows: Vec<ArticleRecord>) -> CorpusTable {
        CorpusTable::new(rows)
    }

    #[test]
    fn test_exact_match_is_only_result() {
        let table = corpus(vec![
            row("Off-plan investment tips", "Returns and payment plans"),
            row("Living in Dubai Marina", "Waterfront apartments and yachts"),
            row("Best schools in Sharjah", "Curriculum and fees"),
        ]);
        let topic = "Living in Dubai Marina Waterfront apartments and yachts";

        let results = Ranker::default().rank(&table, topic);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record, table.rows[1]);
        assert_eq!(results[0].similar_title, "Living in Dubai Marina");
        assert_eq!(results[0].topic, topic);
        assert!((results[0].similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_corpus_gives_empty_result() {
        let results = Ranker::default().rank(&CorpusTable::default(), "dubai marina");
        assert!(results.is_empty());
    }

    #[test]
    fn test_no_shared_vocabulary_gives_empty_result() {
        let table = corpus(vec![
            row("Living in JVC", "Family community"),
            row("Dubai Marina", "Waterfront living"),
        ]);
        assert!(Ranker::default().rank(&table, "quantum chromodynamics").is_empty());
    }

    #[test]
    fn test_all_placeholder_corpus_gives_empty_result() {
        let table = corpus(vec![
            ArticleRecord::filled_with("N/A"),
            crate::scrapers::Site::Bayut.placeholders(),
        ]);
        let ranker = Ranker::default();
        assert_eq!(ranker.processed_text(&table.rows[0]), "");
        assert_eq!(ranker.processed_text(&table.rows[1]), "");
        assert!(ranker.rank(&table, "no title N/A").is_empty());
    }

    #[test]
    fn test_duplicate_titles_keep_lowest_index() {
        let table = corpus(vec![
            row("Dubai Marina Guide", "Dubai Marina Guide"),
            row("Sharjah schools", "Curriculum"),
            row("Dubai Marina Guide", "Dubai Marina Guide apartments"),
        ]);
        let results = Ranker::default().rank(&table, "Dubai Marina Guide");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record, table.rows[0]);
    }

    #[test]
    fn test_scores_bounded_and_above_threshold() {
        let table = corpus(vec![
            row("Dubai Marina apartments", "Waterfront living"),
            row("Dubai Marina villas", "Waterfront living"),
            row("Dubai Marina restaurants", "Waterfront dining"),
            row("Abu Dhabi schools", "Fees"),
        ]);
        let ranker = Ranker::new(Normalizer::default(), 0.3);
        let results = ranker.rank(&table, "Dubai Marina waterfront living");
        assert!(!results.is_empty());
        for r in &results {
            assert!((0.0..=1.0).contains(&r.similarity));
            assert!(r.similarity > ranker.threshold());
        }
    }

    #[test]
    fn test_placeholder_literals_preserved_in_results() {
        let mut matched = row("Living in JVC", "no description");
        matched.publish_date = "no date".to_string();
        let table = corpus(vec![matched.clone(), row("Sharjah", "Schools")]);

        let results = Ranker::default().rank(&table, "living jvc");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.meta_description, "no description");
        assert_eq!(results[0].record.publish_date, "no date");
        assert_eq!(results[0].processed_text, "living jvc");
    }

    #[test]
    fn test_rank_file_response_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![
            row("Dubai Marina apartments", "Waterfront living"),
            row("Dubai Marina villas", "Waterfront living"),
            row("Abu Dhabi schools", "Fees"),
        ];
        write_records(&dir.path().join("links-1.csv"), &rows).unwrap();
        let ranker = Ranker::default();

        let none = ranker
            .rank_file(dir.path(), "links-1.csv", "quantum", false)
            .unwrap();
        assert_eq!(serde_json::to_string(&none).unwrap(), "{}");

        let one = ranker
            .rank_file(dir.path(), "links-1.csv", "Abu Dhabi schools fees", false)
            .unwrap();
        assert!(matches!(one, RankResponse::Single(_)));

        let many = ranker
            .rank_file(dir.path(), "links-1.csv", "Dubai Marina waterfront living", false)
            .unwrap();
        assert!(matches!(many, RankResponse::Many(ref v) if v.len() == 2));

        let missing = ranker.rank_file(dir.path(), "absent.csv", "dubai", false);
        assert!(matches!(missing, Err(PipelineError::MissingInput { .. })));
    }

    #[test]
    fn test_from_settings_applies_extra_stopwords() {
        let settings = Settings {
            threshold: 0.2,
            extra_stopwords: vec!["dubai".to_string()],
            ..Settings::default()
        };
        let ranker = Ranker::from_settings(&settings);
        assert_eq!(ranker.threshold(), 0.2);
        assert_eq!(ranker.processed_text(&row("Dubai Marina", "Dubai living")), "marina living");
    }

    #[test]
    fn test_rank_file_tolerates_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("c.csv"),
            "Title,Publish Date,Meta Description,Canonical Link,Article Content,Yoast Schema Graph\r\n\
             Dubai Marina guide,May 6,Waterfront living,link,body,{}\r\n\
             Only Title\r\n",
        )
        .unwrap();

        let response = Ranker::default()
            .rank_file(dir.path(), "c.csv", "dubai marina guide waterfront living", false)
            .unwrap();
        match response {
            RankResponse::Single(result) => assert_eq!(result.similar_title, "Dubai Marina guide"),
            other => panic!("expected a single match, got {other:?}"),
        }
    }
}
