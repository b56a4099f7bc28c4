use super::VideoStore;
use crate::error::Result;
use crate::models::{VideoId, VideoRecord};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn fetch_by_ids(&self, ids: &[VideoId]) -> Result<Vec<VideoRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT id, url, caption, embeddings::real[] AS embeddings,
                    COALESCE(likes_count, 0) AS likes_count, user_id, created_at
             FROM videos
             WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut videos = Vec::with_capacity(rows.len());
        for row in rows {
            let created_at: Option<NaiveDateTime> = row.try_get("created_at")?;
            videos.push(VideoRecord {
                id: row.try_get("id")?,
                url: row.try_get("url")?,
                caption: row.try_get("caption")?,
                embeddings: row.try_get("embeddings")?,
                likes_count: row.try_get("likes_count")?,
                user_id: row.try_get("user_id")?,
                created_at: created_at.map(|ts| ts.and_utc()),
            });
        }

        Ok(videos)
    }
}
