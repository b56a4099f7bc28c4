// Vector utilities for feed-ranking-service

use crate::error::{RankingError, Result};

/// Cosine similarity between two embeddings, in [-1, 1].
///
/// A zero-magnitude vector on either side carries no signal and yields 0.
/// Vectors of different lengths are rejected instead of truncated.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(RankingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (&x, &y)| {
            let (x, y) = (x as f64, y as f64);
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Mean cosine similarity between `embedding` and every vector in `seen`.
/// Returns 0 when nothing has been seen yet.
pub fn average_similarity(embedding: &[f32], seen: &[Vec<f32>]) -> Result<f64> {
    if seen.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for other in seen {
        total += cosine_similarity(embedding, other)?;
    }

    Ok(total / seen.len() as f64)
}
