use super::ContentSource;
use crate::error::{RankingError, Result};
use crate::models::ContentCandidate;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

/// Content-based recall backed by pgvector.
///
/// Similarity is `1 - cosine_distance` between the user's interest embedding
/// (`user_profiles.embeddings`) and each video embedding.
#[derive(Clone)]
pub struct PgContentSource {
    pool: PgPool,
    embedding_dim: usize,
}

/// Render an embedding as a pgvector text literal: `[0.1,0.2,...]`
pub fn to_pgvector_literal(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(","))
}

impl PgContentSource {
    pub fn new(pool: PgPool, embedding_dim: usize) -> Self {
        Self {
            pool,
            embedding_dim,
        }
    }

    async fn fetch_user_embedding(&self, user_id: &str) -> Result<Option<Vec<f32>>> {
        let row = sqlx::query(
            "SELECT embeddings::real[] AS embeddings FROM user_profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.try_get("embeddings")?),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ContentSource for PgContentSource {
    async fn fetch(
        &self,
        user_id: &str,
        threshold: f64,
        limit: i64,
    ) -> Result<Vec<ContentCandidate>> {
        let user_embedding = match self.fetch_user_embedding(user_id).await? {
            Some(embedding) => embedding,
            None => {
                debug!(
                    user_id = %user_id,
                    "User has no interest embedding, content recall skipped"
                );
                return Ok(Vec::new());
            }
        };

        if user_embedding.len() != self.embedding_dim {
            return Err(RankingError::DimensionMismatch {
                expected: self.embedding_dim,
                actual: user_embedding.len(),
            });
        }

        let rows = sqlx::query(
            "SELECT id, similarity
             FROM (
                 SELECT id, 1 - (embeddings <=> $1::vector) AS similarity
                 FROM videos
                 WHERE embeddings IS NOT NULL
             ) scored
             WHERE similarity > $2 AND similarity <> 'NaN'::float8
             ORDER BY similarity DESC
             LIMIT $3",
        )
        .bind(to_pgvector_literal(&user_embedding))
        .bind(threshold)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        // pgvector yields NaN for zero vectors, which Postgres sorts above every number.
        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            let similarity: f64 = row.try_get("similarity")?;
            if !similarity.is_finite() {
                continue;
            }
            candidates.push(ContentCandidate {
                video_id: row.try_get("id")?,
                similarity,
            });
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pgvector_literal() {
        assert_eq!(to_pgvector_literal(&[0.5, -1.0, 0.25]), "[0.5,-1,0.25]");
        assert_eq!(to_pgvector_literal(&[]), "[]");
    }
}
