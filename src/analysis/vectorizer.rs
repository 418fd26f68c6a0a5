//! Topic Vectorizer - TF-IDF over topic documents
//!
//! Each repository becomes one "document": its topics joined by spaces.
//! Weighting follows the classic smoothed TF-IDF:
//!
//! - tokens: lowercase runs of 2+ word characters (`machine-learning` gives
//!   `machine` and `learning`)
//! - tf: raw count of the token in the document
//! - idf: `ln((1 + n) / (1 + df)) + 1`
//! - rows are L2-normalized
//!
//! Terms are pruned by document frequency before weighting, and the
//! vocabulary is kept in alphabetical order.

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use regex::Regex;

use super::algorithms::{SparseMatrix, SparseVector};
use crate::core::error::{Result, StarError};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Split a document into lowercase tokens
pub fn tokenize(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

// =============================================================================
// Vectorizer
// =============================================================================

/// Configuration for vectorization.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// Drop terms found in more than this fraction of documents
    pub max_df: f64,
    /// Drop terms found in fewer than this many documents
    pub min_df: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            max_df: 0.85,
            min_df: 2,
        }
    }
}

/// Weighted documents plus the vocabulary that indexes their columns.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    /// Column terms, alphabetical
    pub vocabulary: Vec<String>,
    /// Inverse document frequency per column
    pub idf: Vec<f32>,
    /// One L2-normalized row per document
    pub matrix: SparseMatrix,
}

impl TfidfMatrix {
    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn n_documents(&self) -> usize {
        self.matrix.n_rows()
    }
}

impl TfidfVectorizer {
    pub fn new(max_df: f64, min_df: usize) -> Self {
        Self { max_df, min_df }
    }

    /// Learn the vocabulary and idf from `documents` and weight them.
    ///
    /// # Errors
    ///
    /// Returns `Vectorize` when the df bounds contradict each other for this
    /// corpus size or when no term survives pruning.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<TfidfMatrix> {
        let n_docs = documents.len();
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        // Document frequency per term
        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        if df.is_empty() {
            return Err(StarError::vectorize(
                "empty vocabulary; the documents contain no terms of two or more characters",
            ));
        }

        let max_doc_count = self.max_df * n_docs as f64;
        if max_doc_count < self.min_df as f64 {
            return Err(StarError::vectorize(
                "max_df corresponds to < documents than min_df",
            ));
        }

        // BTreeMap iteration is alphabetical, so column order is too
        let vocabulary: Vec<String> = df
            .iter()
            .filter(|(_, &count)| count >= self.min_df && count as f64 <= max_doc_count)
            .map(|(term, _)| term.to_string())
            .collect();

        if vocabulary.is_empty() {
            return Err(StarError::vectorize(
                "After pruning, no terms remain. Try a lower min_df or a higher max_df.",
            ));
        }

        let column: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let idf: Vec<f32> = vocabulary
            .iter()
            .map(|term| {
                let count = df[term.as_str()] as f64;
                (((1.0 + n_docs as f64) / (1.0 + count)).ln() + 1.0) as f32
            })
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
                for token in tokens {
                    if let Some(&col) = column.get(token.as_str()) {
                        *counts.entry(col).or_insert(0.0) += 1.0;
                    }
                }

                let (indices, mut values): (Vec<usize>, Vec<f32>) = counts
                    .into_iter()
                    .map(|(col, tf)| (col, tf * idf[col]))
                    .unzip();

                let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
                if norm > 0.0 {
                    values.iter_mut().for_each(|v| *v /= norm);
                }

                SparseVector { indices, values }
            })
            .collect();

        tracing::info!(
            documents = n_docs,
            terms = vocabulary.len(),
            "vectorized topic documents"
        );

        Ok(TfidfMatrix {
            matrix: SparseMatrix::new(rows, vocabulary.len()),
            vocabulary,
            idf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Machine-Learning rust a x2 c++"),
            vec!["machine", "learning", "rust", "x2"]
        );
    }

    #[test]
    fn test_tokenize_underscores_are_word_chars() {
        assert_eq!(tokenize("web_dev"), vec!["web_dev"]);
    }

    #[test]
    fn test_min_df_prunes_rare_terms() {
        let docs = ["rust cli", "rust web", "python web", "go"];
        let result = TfidfVectorizer::new(1.0, 2).fit_transform(&docs).unwrap();
        assert_eq!(result.vocabulary, vec!["rust", "web"]);
    }

    #[test]
    fn test_max_df_prunes_ubiquitous_terms() {
        // "awesome" is in 4/4 documents > 0.85 * 4
        let docs = [
            "awesome rust",
            "awesome rust",
            "awesome python",
            "awesome python",
        ];
        let result = TfidfVectorizer::default().fit_transform(&docs).unwrap();
        assert_eq!(result.vocabulary, vec!["python", "rust"]);
    }

    #[test]
    fn test_idf_and_normalization() {
        let docs = ["rust cli", "rust web", "cli web", "rust"];
        let result = TfidfVectorizer::new(1.0, 1).fit_transform(&docs).unwrap();
        assert_eq!(result.vocabulary, vec!["cli", "rust", "web"]);

        // rust: df=3, n=4 -> ln(5/4) + 1
        let expected = (5.0f64 / 4.0).ln() + 1.0;
        assert!((result.idf[1] as f64 - expected).abs() < 1e-6);
        // cli: df=2 -> ln(5/3) + 1
        let expected = (5.0f64 / 3.0).ln() + 1.0;
        assert!((result.idf[0] as f64 - expected).abs() < 1e-6);

        for row in &result.matrix.rows {
            assert!((row.squared_norm() - 1.0).abs() < 1e-5);
        }

        // Single-term document is a unit vector on that term
        assert_eq!(result.matrix.rows[3].indices, vec![1]);
        assert!((result.matrix.rows[3].values[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_tokens_count() {
        let docs = ["rust rust cli", "rust cli"];
        let result = TfidfVectorizer::new(1.0, 1).fit_transform(&docs).unwrap();
        // Both terms share df, so weights follow raw counts 2:1
        let row = &result.matrix.rows[0];
        assert!((row.values[1] / row.values[0] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_document_with_only_pruned_terms_is_zero_row() {
        let docs = ["rust", "rust", "zig"];
        let result = TfidfVectorizer::new(1.0, 2).fit_transform(&docs).unwrap();
        assert_eq!(result.n_documents(), 3);
        assert_eq!(result.matrix.rows[2].nnz(), 0);
    }

    #[test]
    fn test_no_terms_remain() {
        let docs = ["alpha", "beta", "gamma"];
        let err = TfidfVectorizer::default().fit_transform(&docs).unwrap_err();
        assert!(err.to_string().contains("no terms remain"));
    }

    #[test]
    fn test_contradictory_bounds() {
        // 0.85 * 2 documents = 1.7 < min_df 2
        let docs = ["rust", "rust"];
        let err = TfidfVectorizer::default().fit_transform(&docs).unwrap_err();
        assert!(err.to_string().contains("max_df corresponds to < documents than min_df"));
    }

    #[test]
    fn test_empty_vocabulary() {
        let docs = ["a b", "c"];
        assert!(matches!(
            TfidfVectorizer::default().fit_transform(&docs),
            Err(StarError::Vectorize { .. })
        ));
    }
}
