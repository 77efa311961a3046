//! Cosine similarity between document vectors

/// Compute cosine similarity between two equal-length vectors.
///
/// Returns a value in `[-1, 1]`; a zero vector is treated as
/// orthogonal to everything (similarity 0.0).
///
/// # Panics
///
/// Panics in debug builds if the vectors differ in length. Vectors
/// produced by one [`TfidfVectorizer`](crate::text::TfidfVectorizer)
/// fit always share a length.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vector length mismatch");

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_are_fully_similar() {
        let v = [1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn similar_direction_scores_high() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]);
        assert!(sim > 0.9);
    }
}
