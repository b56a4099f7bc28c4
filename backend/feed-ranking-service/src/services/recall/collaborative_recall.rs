use super::CollaborativeSource;
use crate::error::Result;
use crate::models::CollaborativeCandidate;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

/// Redis key prefix written by the offline collaborative-filtering job
const RECOMMENDATIONS_KEY: &str = "recommendations:";

pub fn recommendations_key(user_id: &str) -> String {
    format!("{}{}", RECOMMENDATIONS_KEY, user_id)
}

/// Reads the per-user JSON list `[{"video_id": .., "score": ..}]` cached by the
/// collaborative model. A missing key is a cold start, not an error.
#[derive(Clone)]
pub struct RedisCollaborativeSource {
    manager: ConnectionManager,
}

impl RedisCollaborativeSource {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    fn parse(payload: Option<String>) -> Result<Vec<CollaborativeCandidate>> {
        match payload {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl CollaborativeSource for RedisCollaborativeSource {
    async fn fetch(&self, user_id: &str) -> Result<Vec<CollaborativeCandidate>> {
        let mut conn = self.manager.clone();
        let key = recommendations_key(user_id);

        let payload: Option<String> = conn.get(&key).await?;
        if payload.is_none() {
            debug!(user_id = %user_id, "No cached collaborative recommendations");
        }

        Self::parse(payload)
    }
}
