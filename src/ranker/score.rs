//! Cosine scoring and threshold selection.

use super::vectorize::SparseVector;
use crate::models::ArticleRecord;
use itertools::Itertools;

/// Cosine similarity of two sparse vectors, clamped to `[0, 1]`.
///
/// A zero vector on either side scores 0.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let norm_a = a.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Both vectors are sorted by column, so a merge walk finds shared terms.
    let (mut i, mut j, mut dot) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Score `query` against every row of `matrix`, in row order.
pub fn similarities(query: &SparseVector, matrix: &[SparseVector]) -> Vec<f64> {
    matrix.iter().map(|row| cosine(query, row)).collect()
}

/// Pick rows scoring strictly above `threshold`, keeping only the first row
/// (in corpus order) for each distinct title.
///
/// A later row with the same title is dropped even when it scores higher.
/// Returns `(row index, score)` pairs in corpus order.
pub fn select(scores: &[f64], rows: &[ArticleRecord], threshold: f64) -> Vec<(usize, f64)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, score)| score > threshold)
        .unique_by(|&(i, _)| rows[i].title.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            ..ArticleRecord::default()
        }
    }

    #[test]
    fn test_cosine_basic() {
        let a = vec![(0, 1.0), (2, 1.0)];
        let b = vec![(0, 1.0), (1, 1.0)];
        assert!((cosine(&a, &b) - 0.5).abs() < 1e-12);
        assert!((cosine(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vec![(0, 1.0)];
        assert_eq!(cosine(&a, &vec![]), 0.0);
        assert_eq!(cosine(&vec![], &vec![]), 0.0);
    }

    #[test]
    fn test_cosine_disjoint() {
        assert_eq!(cosine(&vec![(0, 0.3)], &vec![(1, 0.7)]), 0.0);
    }

    #[test]
    fn test_select_is_strict() {
        let rows = vec![titled("a"), titled("b"), titled("c")];
        let picked = select(&[0.5, 0.51, 0.49], &rows, 0.5);
        assert_eq!(picked, vec![(1, 0.51)]);
    }

    #[test]
    fn test_select_dedup_keeps_first_occurrence() {
        let rows = vec![titled("Dubai Marina"), titled("JVC"), titled("Dubai Marina")];
        let picked = select(&[0.6, 0.2, 0.9], &rows, 0.5);
        assert_eq!(picked, vec![(0, 0.6)]);
    }

    #[test]
    fn test_select_dedup_ignores_rows_below_threshold() {
        // A low-scoring duplicate does not block a later qualifying one.
        let rows = vec![titled("Dubai Marina"), titled("Dubai Marina")];
        let picked = select(&[0.1, 0.8], &rows, 0.5);
        assert_eq!(picked, vec![(1, 0.8)]);
    }

    #[test]
    fn test_select_preserves_corpus_order() {
        let rows = vec![titled("a"), titled("b"), titled("c")];
        let picked = select(&[0.6, 0.99, 0.7], &rows, 0.5);
        let order: Vec<usize> = picked.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }
}
