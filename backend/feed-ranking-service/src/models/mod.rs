use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of the `videos` table (serial).
pub type VideoId = i32;

/// Candidate produced by the offline collaborative model and cached per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborativeCandidate {
    pub video_id: VideoId,
    pub score: f64,
}

/// Candidate produced by a similarity search against the user's interest embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCandidate {
    pub video_id: VideoId,
    pub similarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallSource {
    Collaborative,
    Content,
}

impl RecallSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecallSource::Collaborative => "collaborative",
            RecallSource::Content => "content",
        }
    }
}

/// Interaction kinds recorded in `user_interactions.interaction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Like,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
        }
    }
}

/// Video metadata as stored in the `videos` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: VideoId,
    pub url: String,
    pub caption: Option<String>,
    /// Absent embeddings keep the video rankable but out of similarity comparisons.
    #[serde(default, skip_serializing)]
    pub embeddings: Option<Vec<f32>>,
    pub likes_count: i32,
    pub user_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A video in the final feed. Built once per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedVideo {
    #[serde(flatten)]
    pub video: VideoRecord,
    pub score: f64,
    pub is_based_collaborative: bool,
    pub is_based_content: bool,
    pub is_liked: bool,
}

impl RankedVideo {
    pub fn id(&self) -> VideoId {
        self.video.id
    }

    pub fn embeddings(&self) -> Option<&[f32]> {
        self.video.embeddings.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingStats {
    pub collaborative_count: usize,
    pub content_count: usize,
    pub merged_count: usize,
    pub loaded_count: usize,
    pub penalized_count: usize,
    pub final_count: usize,
}
