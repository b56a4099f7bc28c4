use super::aggregation::{MergedScores, ScoreAggregator};
use super::assembler::ResultAssembler;
use super::diversity::DiversityLayer;
use super::recall::RecallLayer;
use crate::db::VideoStore;
use crate::error::Result;
use crate::metrics;
use crate::models::{RankedVideo, RankingStats, VideoRecord};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Recommendation engine: recall → merge → load → diversity → assemble.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct RecommendationEngine {
    recall: RecallLayer,
    aggregator: ScoreAggregator,
    videos: Arc<dyn VideoStore>,
    diversity: DiversityLayer,
    assembler: ResultAssembler,
}

impl RecommendationEngine {
    pub fn new(
        recall: RecallLayer,
        videos: Arc<dyn VideoStore>,
        diversity: DiversityLayer,
        assembler: ResultAssembler,
    ) -> Self {
        Self {
            recall,
            aggregator: ScoreAggregator::new(),
            videos,
            diversity,
            assembler,
        }
    }

    /// Ranked feed for `user_id`. A user with no candidates gets an empty feed;
    /// any collaborator failure aborts the whole computation.
    pub async fn generate_recommendations(&self, user_id: &str) -> Result<Vec<RankedVideo>> {
        let started = Instant::now();
        let mut stats = RankingStats::default();

        let (collaborative, content) = self.recall.recall_candidates(user_id).await?;
        stats.collaborative_count = collaborative.len();
        stats.content_count = content.len();

        let merged = self.aggregator.merge(&collaborative, &content);
        stats.merged_count = merged.len();

        if merged.is_empty() {
            info!(user_id = %user_id, "No recommendation candidates, returning empty feed");
            metrics::record_generation(&stats, started.elapsed());
            return Ok(Vec::new());
        }

        let records = self.videos.fetch_by_ids(merged.ids()).await?;
        let candidates = attach_scores(&merged, records);
        stats.loaded_count = candidates.len();

        if stats.loaded_count < stats.merged_count {
            warn!(
                user_id = %user_id,
                missing = stats.merged_count - stats.loaded_count,
                "Candidate videos not found in store, dropping them"
            );
        }

        let diversified = self.diversity.run(candidates)?;
        stats.penalized_count = diversified.penalized;

        let ranked = self
            .assembler
            .assemble(user_id, diversified.results, merged.ids())
            .await?;
        stats.final_count = ranked.len();

        info!(
            user_id = %user_id,
            collaborative = stats.collaborative_count,
            content = stats.content_count,
            merged = stats.merged_count,
            loaded = stats.loaded_count,
            penalized = stats.penalized_count,
            returned = stats.final_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recommendations generated"
        );
        metrics::record_generation(&stats, started.elapsed());

        Ok(ranked)
    }
}

/// Pair loaded records with their merged score and provenance, in merge order.
/// Ids the store did not return are dropped.
fn attach_scores(merged: &MergedScores, records: Vec<VideoRecord>) -> Vec<RankedVideo> {
    let mut by_id: HashMap<_, _> = records.into_iter().map(|v| (v.id, v)).collect();

    merged
        .iter()
        .filter_map(|(video_id, entry)| {
            by_id.remove(&video_id).map(|video| RankedVideo {
                video,
                score: entry.score,
                is_based_collaborative: entry.from_collaborative,
                is_based_content: entry.from_content,
                is_liked: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecallConfig;
    use crate::db::{MockInteractionStore, MockVideoStore};
    use crate::error::RankingError;
    use crate::models::{CollaborativeCandidate, ContentCandidate, VideoId};
    use crate::services::recall::{MockCollaborativeSource, MockContentSource};
    use std::collections::HashSet;

    fn record(id: VideoId, embeddings: Option<Vec<f32>>) -> VideoRecord {
        VideoRecord {
            id,
            url: format!("https://cdn.example.com/{}.mp4", id),
            caption: Some(format!("video {}", id)),
            embeddings,
            likes_count: 0,
            user_id: "creator".to_string(),
            created_at: None,
        }
    }

    fn recall(
        collaborative: Vec<CollaborativeCandidate>,
        content: Vec<ContentCandidate>,
    ) -> RecallLayer {
        let mut collaborative_source = MockCollaborativeSource::new();
        collaborative_source
            .expect_fetch()
            .returning(move |_| Ok(collaborative.clone()));

        let mut content_source = MockContentSource::new();
        content_source
            .expect_fetch()
            .returning(move |_, _, _| Ok(content.clone()));

        RecallLayer::new(
            Arc::new(collaborative_source),
            Arc::new(content_source),
            RecallConfig {
                content_similarity_threshold: 0.25,
                content_limit: 10,
            },
        )
    }

    fn no_likes() -> ResultAssembler {
        let mut interactions = MockInteractionStore::new();
        interactions
            .expect_fetch_liked()
            .returning(|_, _| Ok(HashSet::new()));
        ResultAssembler::new(Arc::new(interactions))
    }

    #[test]
    fn test_attach_scores_restores_merge_order_and_drops_missing() {
        let merged = ScoreAggregator::new().merge(
            &[
                CollaborativeCandidate {
                    video_id: 5,
                    score: 1.0,
                },
                CollaborativeCandidate {
                    video_id: 2,
                    score: 1.0,
                },
            ],
            &[ContentCandidate {
                video_id: 8,
                similarity: 0.5,
            }],
        );

        // Store returns rows in its own order and does not know video 2.
        let attached = attach_scores(&merged, vec![record(8, None), record(5, None)]);

        let ids: Vec<VideoId> = attached.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![5, 8]);
        assert!(attached[0].is_based_collaborative && !attached[0].is_based_content);
        assert!(!attached[1].is_based_collaborative && attached[1].is_based_content);
    }

    #[tokio::test]
    async fn test_empty_candidates_skip_stores() {
        let mut videos = MockVideoStore::new();
        videos.expect_fetch_by_ids().times(0);

        let mut interactions = MockInteractionStore::new();
        interactions.expect_fetch_liked().times(0);

        let engine = RecommendationEngine::new(
            recall(Vec::new(), Vec::new()),
            Arc::new(videos),
            DiversityLayer::default(),
            ResultAssembler::new(Arc::new(interactions)),
        );

        let feed = engine.generate_recommendations("cold_user").await.unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_video_store_failure_aborts() {
        let mut videos = MockVideoStore::new();
        videos
            .expect_fetch_by_ids()
            .returning(|_| Err(RankingError::Database(sqlx::Error::PoolTimedOut)));

        let engine = RecommendationEngine::new(
            recall(
                vec![CollaborativeCandidate {
                    video_id: 1,
                    score: 2.0,
                }],
                Vec::new(),
            ),
            Arc::new(videos),
            DiversityLayer::default(),
            no_likes(),
        );

        let result = engine.generate_recommendations("user").await;
        assert!(matches!(result, Err(RankingError::Database(_))));
    }

    #[tokio::test]
    async fn test_penalized_order_is_merge_order() {
        // Video 2 outranks video 1 on merged score but comes second in merge order,
        // so it is the one compared against video 1 and penalized.
        let mut videos = MockVideoStore::new();
        videos.expect_fetch_by_ids().returning(|_| {
            Ok(vec![
                record(2, Some(vec![1.0, 0.0])),
                record(1, Some(vec![1.0, 0.0])),
            ])
        });

        let engine = RecommendationEngine::new(
            recall(
                vec![
                    CollaborativeCandidate {
                        video_id: 1,
                        score: 1.0,
                    },
                    CollaborativeCandidate {
                        video_id: 2,
                        score: 4.0,
                    },
                ],
                Vec::new(),
            ),
            Arc::new(videos),
            DiversityLayer::default(),
            no_likes(),
        );

        let feed = engine.generate_recommendations("user").await.unwrap();

        assert_eq!(feed[0].id(), 2);
        assert!((feed[0].score - (2.8 - 0.2)).abs() < 1e-9);
        assert!((feed[1].score - 0.7).abs() < 1e-9);
    }
}
