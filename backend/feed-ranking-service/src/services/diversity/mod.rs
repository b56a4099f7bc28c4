use crate::error::Result;
use crate::models::RankedVideo;
use crate::utils::average_similarity;
use tracing::debug;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;
pub const DEFAULT_PENALTY_WEIGHT: f64 = 0.2;

/// Diversity Layer - greedy similarity penalty
///
/// Walks candidates in merge order (NOT score order) and penalizes each video by
/// `avg * penalty_weight` when its average cosine similarity to every embedding
/// accepted so far exceeds `similarity_threshold`. The average, rather than the
/// closest neighbour, is the intended policy.
///
/// The pass is inherently sequential: each step depends on everything seen before it.
#[derive(Debug, Clone, Copy)]
pub struct DiversityLayer {
    similarity_threshold: f64,
    penalty_weight: f64,
}

/// Accumulator threaded through the fold.
#[derive(Debug, Clone, Default)]
pub struct DiversityState {
    pub results: Vec<RankedVideo>,
    pub seen_embeddings: Vec<Vec<f32>>,
    pub penalized: usize,
}

impl Default for DiversityLayer {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_PENALTY_WEIGHT)
    }
}

impl DiversityLayer {
    pub fn new(similarity_threshold: f64, penalty_weight: f64) -> Self {
        Self {
            similarity_threshold,
            penalty_weight,
        }
    }

    /// Apply the penalty pass and return the adjusted videos in input order.
    pub fn apply(&self, videos: Vec<RankedVideo>) -> Result<Vec<RankedVideo>> {
        Ok(self.run(videos)?.results)
    }

    /// Same as [`apply`](Self::apply) but keeps the full accumulator.
    pub fn run(&self, videos: Vec<RankedVideo>) -> Result<DiversityState> {
        videos
            .into_iter()
            .try_fold(DiversityState::default(), |state, video| {
                self.step(state, video)
            })
    }

    fn step(&self, state: DiversityState, mut video: RankedVideo) -> Result<DiversityState> {
        let DiversityState {
            mut results,
            mut seen_embeddings,
            mut penalized,
        } = state;

        let avg_similarity = match video.embeddings() {
            Some(embedding) if !seen_embeddings.is_empty() => {
                average_similarity(embedding, &seen_embeddings)?
            }
            _ => 0.0,
        };

        if avg_similarity > self.similarity_threshold {
            let penalty = avg_similarity * self.penalty_weight;
            debug!(
                video_id = video.id(),
                avg_similarity,
                penalty,
                "Diversity penalty applied"
            );
            video.score -= penalty;
            penalized += 1;
        }

        // Never negative, penalized or not
        video.score = video.score.max(0.0);

        if let Some(embedding) = video.video.embeddings.clone() {
            seen_embeddings.push(embedding);
        }
        results.push(video);

        Ok(DiversityState {
            results,
            seen_embeddings,
            penalized,
        })
    }
}
