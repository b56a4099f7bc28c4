/// Store interfaces consumed by the ranking engine, with their Postgres implementations.
pub mod interaction_repo;
pub mod video_repo;

use crate::error::Result;
use crate::models::{VideoId, VideoRecord};
use async_trait::async_trait;
use std::collections::HashSet;

pub use interaction_repo::PgInteractionStore;
pub use video_repo::PgVideoStore;

/// Batch lookup of video metadata.
///
/// Ids with no matching row are silently dropped; output order is unspecified.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn fetch_by_ids(&self, ids: &[VideoId]) -> Result<Vec<VideoRecord>>;
}

/// Batch membership check over a user's "like" interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn fetch_liked(&self, user_id: &str, ids: &[VideoId]) -> Result<HashSet<VideoId>>;
}
