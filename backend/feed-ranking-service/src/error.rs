/// Error types for the feed ranking service
///
/// Collaborator failures (Postgres, Redis, malformed cached payloads) are carried
/// unchanged so the caller sees exactly what aborted the computation. Empty inputs
/// are never errors.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankingError>;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Recommendation timed out after {0}ms")]
    Timeout(u64),
}

impl ResponseError for RankingError {
    fn status_code(&self) -> StatusCode {
        match self {
            RankingError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RankingError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            RankingError::Unauthorized(_) => "Unauthorized",
            RankingError::Timeout(_) => "Recommendation request timed out",
            _ => "Failed to fetch videos",
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
