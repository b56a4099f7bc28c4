use crate::models::{CollaborativeCandidate, ContentCandidate, RecallSource, VideoId};
use std::collections::HashMap;

pub const COLLABORATIVE_WEIGHT: f64 = 0.7;
pub const CONTENT_WEIGHT: f64 = 0.3;
/// Content similarity lives in [0, 1]; collaborative ratings live in [0, 5].
pub const CONTENT_SCALE: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MergedEntry {
    pub score: f64,
    pub from_collaborative: bool,
    pub from_content: bool,
}

/// Score per video, iterated in first-insertion order.
///
/// The diversity pass walks candidates in this order, so it must stay
/// collaborative-first, then content-only videos.
#[derive(Debug, Clone, Default)]
pub struct MergedScores {
    order: Vec<VideoId>,
    entries: HashMap<VideoId, MergedEntry>,
}

impl MergedScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a weighted contribution for `video_id`, starting from zero.
    pub fn add(&mut self, video_id: VideoId, contribution: f64, source: RecallSource) {
        let order = &mut self.order;
        let entry = self.entries.entry(video_id).or_insert_with(|| {
            order.push(video_id);
            MergedEntry::default()
        });

        entry.score += contribution;
        match source {
            RecallSource::Collaborative => entry.from_collaborative = true,
            RecallSource::Content => entry.from_content = true,
        }
    }

    pub fn get(&self, video_id: VideoId) -> Option<&MergedEntry> {
        self.entries.get(&video_id)
    }

    pub fn ids(&self) -> &[VideoId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (VideoId, &MergedEntry)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entries.get(id).map(|entry| (*id, entry)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Weighted additive fusion of the two candidate sources. No normalization is
/// applied across the merged set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(
        &self,
        collaborative: &[CollaborativeCandidate],
        content: &[ContentCandidate],
    ) -> MergedScores {
        let mut merged = MergedScores::new();

        for candidate in collaborative {
            merged.add(
                candidate.video_id,
                candidate.score * COLLABORATIVE_WEIGHT,
                RecallSource::Collaborative,
            );
        }

        // A zero-magnitude embedding carries no signal.
        for candidate in content.iter().filter(|c| c.similarity.is_finite()) {
            merged.add(
                candidate.video_id,
                candidate.similarity * CONTENT_SCALE * CONTENT_WEIGHT,
                RecallSource::Content,
            );
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collab(video_id: VideoId, score: f64) -> CollaborativeCandidate {
        CollaborativeCandidate { video_id, score }
    }

    fn content(video_id: VideoId, similarity: f64) -> ContentCandidate {
        ContentCandidate {
            video_id,
            similarity,
        }
    }

    #[test]
    fn test_merge_scores_both_sources() {
        let merged = ScoreAggregator::new().merge(
            &[collab(1, 4.0), collab(2, 2.0)],
            &[content(2, 0.5), content(3, 0.9)],
        );

        assert_eq!(merged.ids(), &[1, 2, 3]);
        assert!((merged.get(1).unwrap().score - 2.8).abs() < 1e-9);
        assert!((merged.get(2).unwrap().score - 2.15).abs() < 1e-9);
        assert!((merged.get(3).unwrap().score - 1.35).abs() < 1e-9);
    }

    #[test]
    fn test_merge_provenance_flags() {
        let merged = ScoreAggregator::new().merge(
            &[collab(1, 1.0)],
            &[content(1, 0.4), content(5, 0.3)],
        );

        let both = merged.get(1).unwrap();
        assert!(both.from_collaborative && both.from_content);

        let content_only = merged.get(5).unwrap();
        assert!(!content_only.from_collaborative);
        assert!(content_only.from_content);
    }

    #[test]
    fn test_merge_single_source_contribution() {
        let merged = ScoreAggregator::new().merge(&[collab(10, 3.0)], &[]);
        assert_eq!(merged.get(10).unwrap().score, 3.0 * COLLABORATIVE_WEIGHT);

        let merged = ScoreAggregator::new().merge(&[], &[content(11, 0.6)]);
        assert_eq!(
            merged.get(11).unwrap().score,
            0.6 * CONTENT_SCALE * CONTENT_WEIGHT
        );
    }

    #[test]
    fn test_merge_keeps_insertion_order() {
        let merged = ScoreAggregator::new().merge(
            &[collab(9, 0.1), collab(4, 5.0)],
            &[content(7, 0.9), content(9, 0.9), content(1, 0.3)],
        );

        assert_eq!(merged.ids(), &[9, 4, 7, 1]);
        let iterated: Vec<VideoId> = merged.iter().map(|(id, _)| id).collect();
        assert_eq!(iterated, vec![9, 4, 7, 1]);
    }

    #[test]
    fn test_merge_skips_nan_similarity() {
        let merged = ScoreAggregator::new().merge(
            &[collab(1, 4.0)],
            &[content(1, f64::NAN), content(2, f64::NAN)],
        );

        assert_eq!(merged.ids(), &[1]);
        let entry = merged.get(1).unwrap();
        assert!((entry.score - 2.8).abs() < 1e-9);
        assert!(entry.from_collaborative);
        assert!(!entry.from_content);
    }

    #[test]
    fn test_merge_empty_inputs() {
        let merged = ScoreAggregator::new().merge(&[], &[]);
        assert!(merged.is_empty());
        assert_eq!(merged.len(), 0);
    }
}
