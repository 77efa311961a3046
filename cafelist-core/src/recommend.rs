//! Content-similarity café recommendations
//!
//! Each café contributes one text document (description plus its
//! category names). The full corpus is vectorized per call and the
//! target's nearest neighbours by cosine similarity are returned.
//! Nothing is cached between calls.

use thiserror::Error;

use crate::text::{cosine_similarity, TfidfVectorizer};

/// Number of recommendations returned
const TOP_N: usize = 3;

/// One café's text document for the recommender
#[derive(Debug, Clone)]
pub struct CafeDoc {
    pub id: i64,
    pub text: String,
}

impl CafeDoc {
    /// Build the recommendation document from a café's description and
    /// category names, matching the persisted view of the café.
    pub fn from_parts(
        id: i64,
        description: &str,
        best_for: Option<&str>,
        also_good_for: &[String],
    ) -> Self {
        let mut text = description.to_owned();
        if let Some(best) = best_for {
            text.push(' ');
            text.push_str(best);
        }
        for name in also_good_for {
            text.push(' ');
            text.push_str(name);
        }
        Self { id, text }
    }
}

/// Recommendation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    #[error("cafe {0} not found")]
    TargetNotFound(i64),
}

/// Rank the corpus by textual similarity to the target café.
///
/// Returns at most [`TOP_N`] café ids ordered by descending cosine
/// similarity, never including the target. A corpus with fewer than
/// two documents has no meaningful comparison and yields an empty
/// list. Ties keep corpus order (the sort is stable).
pub fn recommend_similar(target_id: i64, corpus: &[CafeDoc]) -> Result<Vec<i64>, RecommendError> {
    let target_idx = corpus
        .iter()
        .position(|doc| doc.id == target_id)
        .ok_or(RecommendError::TargetNotFound(target_id))?;

    if corpus.len() < 2 {
        return Ok(Vec::new());
    }

    let texts: Vec<&str> = corpus.iter().map(|doc| doc.text.as_str()).collect();
    let vectors = TfidfVectorizer::new().fit_transform(&texts);
    let target = &vectors[target_idx];

    let mut scored: Vec<(i64, f64)> = corpus
        .iter()
        .zip(&vectors)
        .filter(|(doc, _)| doc.id != target_id)
        .map(|(doc, vector)| (doc.id, cosine_similarity(target, vector)))
        .collect();

    // Stable sort: equal scores keep corpus order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(TOP_N);

    Ok(scored.into_iter().map(|(id, _)| id).collect())
}
