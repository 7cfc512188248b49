//! TF-IDF vector space over normalized documents.
//!
//! Weighting:
//!
//! ```text
//! tf(t, d)  = raw count of t in d
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), then each row is L2-normalised
//! ```
//!
//! Tokens are whitespace-separated words of at least two characters. The
//! vocabulary is fixed by [`TfIdfVectorizer::fit`]; [`TfIdfVectorizer::transform`]
//! maps new text into the same space and ignores terms it has never seen.
//!
//! An empty corpus, or one whose documents are all empty, produces an empty
//! vocabulary. Every transform against it is the zero vector.

use std::collections::{BTreeMap, HashSet};

/// Shortest token kept in the vocabulary.
pub const MIN_TOKEN_LEN: usize = 2;

/// Sparse vector as `(term index, weight)` pairs sorted by term index.
pub type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfIdfVectorizer {
    /// Term to column index, lexicographic.
    vocabulary: BTreeMap<String, usize>,
    /// IDF weight per column.
    idf: Vec<f64>,
}

fn tokens(doc: &str) -> impl Iterator<Item = &str> {
    doc.split_whitespace().filter(|t| t.len() >= MIN_TOKEN_LEN)
}

impl TfIdfVectorizer {
    /// Learn vocabulary and IDF weights from `docs`.
    pub fn fit<S: AsRef<str>>(docs: &[S]) -> Self {
        let n = docs.len() as f64;
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in docs {
            let unique: HashSet<&str> = tokens(doc.as_ref()).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // BTreeMap iteration order is the column order for both maps.
        let vocabulary: BTreeMap<String, usize> = doc_freq
            .keys()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();
        let idf = doc_freq
            .values()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// Fit on `docs` and return each document's vector, in order.
    pub fn fit_transform<S: AsRef<str>>(docs: &[S]) -> (Self, Vec<SparseVector>) {
        let vectorizer = Self::fit(docs);
        let matrix = docs.iter().map(|d| vectorizer.transform(d.as_ref())).collect();
        (vectorizer, matrix)
    }

    /// Map `doc` into the fitted space. Unknown terms contribute nothing.
    pub fn transform(&self, doc: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in tokens(doc) {
            if let Some(&col) = self.vocabulary.get(term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(col, tf)| (col, tf * self.idf[col]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in vector.iter_mut() {
                *w /= norm;
            }
        }
        vector
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// IDF weight of `term`, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&col| self.idf[col])
    }
}
