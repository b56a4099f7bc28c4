mod collaborative_recall;
mod content_recall;

use crate::config::RecallConfig;
use crate::error::Result;
use crate::models::{CollaborativeCandidate, ContentCandidate};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub use collaborative_recall::{recommendations_key, RedisCollaborativeSource};
pub use content_recall::{to_pgvector_literal, PgContentSource};

pub const DEFAULT_CONTENT_SIMILARITY_THRESHOLD: f64 = 0.25;
pub const DEFAULT_CONTENT_LIMIT: i64 = 10;

/// Source of cached collaborative-filtering candidates.
///
/// Must return an empty list for a cold-start user instead of failing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollaborativeSource: Send + Sync {
    async fn fetch(&self, user_id: &str) -> Result<Vec<CollaborativeCandidate>>;
}

/// Source of embedding-similarity candidates.
///
/// Returns an empty list when the user has no interest embedding. Results are
/// strictly above `threshold`, ordered by descending similarity, at most `limit`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(
        &self,
        user_id: &str,
        threshold: f64,
        limit: i64,
    ) -> Result<Vec<ContentCandidate>>;
}

/// Recall layer: fetches both candidate lists concurrently.
#[derive(Clone)]
pub struct RecallLayer {
    collaborative: Arc<dyn CollaborativeSource>,
    content: Arc<dyn ContentSource>,
    config: RecallConfig,
}

impl RecallLayer {
    pub fn new(
        collaborative: Arc<dyn CollaborativeSource>,
        content: Arc<dyn ContentSource>,
        config: RecallConfig,
    ) -> Self {
        Self {
            collaborative,
            content,
            config,
        }
    }

    /// Either source failing aborts the whole recall; there is no partial result.
    pub async fn recall_candidates(
        &self,
        user_id: &str,
    ) -> Result<(Vec<CollaborativeCandidate>, Vec<ContentCandidate>)> {
        let (collaborative, content) = tokio::try_join!(
            self.collaborative.fetch(user_id),
            self.content.fetch(
                user_id,
                self.config.content_similarity_threshold,
                self.config.content_limit,
            ),
        )?;

        info!(
            user_id = %user_id,
            collaborative = collaborative.len(),
            content = content.len(),
            "Recall completed"
        );

        Ok((collaborative, content))
    }
}
