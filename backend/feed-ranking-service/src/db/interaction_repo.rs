use super::InteractionStore;
use crate::error::Result;
use crate::models::{InteractionType, VideoId};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashSet;

#[derive(Clone)]
pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Video ids among `ids` that the user has an `interaction` row for.
    pub async fn fetch_by_interaction(
        &self,
        user_id: &str,
        ids: &[VideoId],
        interaction: InteractionType,
    ) -> Result<HashSet<VideoId>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = sqlx::query(
            "SELECT DISTINCT video_id
             FROM user_interactions
             WHERE user_id = $1 AND interaction = $2 AND video_id = ANY($3)",
        )
        .bind(user_id)
        .bind(interaction.as_str())
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut video_ids = HashSet::with_capacity(rows.len());
        for row in rows {
            video_ids.insert(row.try_get::<VideoId, _>("video_id")?);
        }

        Ok(video_ids)
    }
}

#[async_trait]
impl InteractionStore for PgInteractionStore {
    async fn fetch_liked(&self, user_id: &str, ids: &[VideoId]) -> Result<HashSet<VideoId>> {
        self.fetch_by_interaction(user_id, ids, InteractionType::Like)
            .await
    }
}
