use crate::db::InteractionStore;
use crate::error::Result;
use crate::models::{RankedVideo, VideoId};
use std::sync::Arc;

/// Final ordering and like status.
#[derive(Clone)]
pub struct ResultAssembler {
    interactions: Arc<dyn InteractionStore>,
}

/// Sort descending by final score. The sort is stable, so equal scores keep the
/// order they arrived in (merge order).
pub fn sort_by_score(videos: &mut [RankedVideo]) {
    videos.sort_by(|a, b| b.score.total_cmp(&a.score));
}

impl ResultAssembler {
    pub fn new(interactions: Arc<dyn InteractionStore>) -> Self {
        Self { interactions }
    }

    /// `candidate_ids` is the full merged id set; the like lookup covers exactly
    /// those ids in one batch.
    pub async fn assemble(
        &self,
        user_id: &str,
        mut videos: Vec<RankedVideo>,
        candidate_ids: &[VideoId],
    ) -> Result<Vec<RankedVideo>> {
        sort_by_score(&mut videos);

        let liked = self.interactions.fetch_liked(user_id, candidate_ids).await?;
        for video in &mut videos {
            video.is_liked = liked.contains(&video.id());
        }

        Ok(videos)
    }
}
