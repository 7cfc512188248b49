//! Text normalization applied to corpus rows and query topics alike.
//!
//! Steps, in order:
//!
//! 1. missing input becomes the empty string
//! 2. lowercase
//! 3. remove ASCII punctuation
//! 4. remove everything outside printable ASCII (whitespace is kept)
//! 5. split on whitespace
//! 6. drop stopwords
//! 7. join the remaining tokens with single spaces
//!
//! Punctuation is deleted rather than replaced, so `real-estate` becomes
//! `realestate`. Non-ASCII letters are dropped after lowercasing, so
//! `Café` becomes `caf`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

/// The NLTK English stopword list.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Process-wide stopword set, built on first use and never mutated.
static ENGLISH: Lazy<Arc<HashSet<String>>> = Lazy::new(|| {
    Arc::new(ENGLISH_STOPWORDS.iter().map(|s| s.to_string()).collect())
});

static NON_PRINTABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\x20-\x7E\t\n\r\x0B\x0C]+").expect("static regex compiles")
});

/// Pure text normalizer over an injected, read-only stopword set.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: Arc<HashSet<String>>,
}

impl Default for Normalizer {
    /// A normalizer sharing the process-wide English stopword set.
    fn default() -> Self {
        Self {
            stopwords: Arc::clone(&ENGLISH),
        }
    }
}

impl Normalizer {
    /// Build a normalizer over an explicit stopword set.
    ///
    /// # Arguments
    ///
    /// * `stopwords` - Lowercase words dropped after tokenization
    pub fn new(stopwords: Arc<HashSet<String>>) -> Self {
        Self { stopwords }
    }

    /// English stopwords plus `extra`, lowercased.
    ///
    /// With no extra words the process-wide English set is shared rather
    /// than copied.
    pub fn with_extra_stopwords(extra: &[String]) -> Self {
        if extra.is_empty() {
            return Self::default();
        }
        let mut words: HashSet<String> = ENGLISH.iter().cloned().collect();
        words.extend(extra.iter().map(|w| w.trim().to_lowercase()));
        Self::new(Arc::new(words))
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Normalize `text`; `None` yields the empty string.
    pub fn normalize(&self, text: Option<&str>) -> String {
        let Some(text) = text else {
            return String::new();
        };

        let lowered = text.to_lowercase();
        let without_punct: String = lowered.chars().filter(|c| !c.is_ascii_punctuation()).collect();
        let ascii = NON_PRINTABLE.replace_all(&without_punct, "");

        ascii
            .split_whitespace()
            .filter(|token| !self.is_stopword(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
