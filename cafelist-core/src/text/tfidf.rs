//! TF-IDF vectorization over a document corpus
//!
//! Converts text documents into TF-IDF weighted vectors. Uses the
//! smoothed idf formula `ln((1 + n) / (1 + df)) + 1` and L2-normalizes
//! each document vector, so cosine similarity between rows reduces to
//! a dot product.

use std::collections::HashMap;

/// Split a document into lowercase alphanumeric tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// TF-IDF vectorizer fitted over a fixed corpus
#[derive(Debug, Default)]
pub struct TfidfVectorizer {
    /// Term -> column index
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the vocabulary and idf weights from `documents` and
    /// return one L2-normalized TF-IDF vector per document.
    ///
    /// An empty corpus yields no vectors; documents with no tokens
    /// yield zero vectors.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Vec<Vec<f64>> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        // Vocabulary in first-seen order, document frequency per term
        self.vocabulary.clear();
        let mut doc_freq: Vec<usize> = Vec::new();
        for tokens in &tokenized {
            let mut seen: Vec<usize> = Vec::new();
            for token in tokens {
                let next = self.vocabulary.len();
                let idx = *self.vocabulary.entry(token.clone()).or_insert(next);
                if idx == doc_freq.len() {
                    doc_freq.push(0);
                }
                if !seen.contains(&idx) {
                    doc_freq[idx] += 1;
                    seen.push(idx);
                }
            }
        }

        let n = tokenized.len() as f64;
        self.idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        tokenized
            .iter()
            .map(|tokens| self.vectorize(tokens))
            .collect()
    }

    fn vectorize(&self, tokens: &[String]) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];
        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                row[idx] += 1.0;
            }
        }
        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }
        row
    }

    /// Number of distinct terms learned from the corpus.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}
