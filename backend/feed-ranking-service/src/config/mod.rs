use crate::services::diversity::{DEFAULT_PENALTY_WEIGHT, DEFAULT_SIMILARITY_THRESHOLD};
use crate::services::recall::{DEFAULT_CONTENT_LIMIT, DEFAULT_CONTENT_SIMILARITY_THRESHOLD};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub recall: RecallConfig,
    pub diversity: DiversityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub port: u16,
    pub service_name: String,
    /// Upper bound for one whole recommendation computation
    pub request_timeout_ms: u64,
    /// Expected dimension of user and video embeddings
    pub embedding_dim: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecallConfig {
    pub content_similarity_threshold: f64,
    pub content_limit: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiversityConfig {
    pub similarity_threshold: f64,
    pub penalty_weight: f64,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            content_similarity_threshold: DEFAULT_CONTENT_SIMILARITY_THRESHOLD,
            content_limit: DEFAULT_CONTENT_LIMIT,
        }
    }
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid {}", key, std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                port: env_or("APP_PORT", 8011)?,
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "feed-ranking-service".to_string()),
                request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 5000)?,
                embedding_dim: env_or("EMBEDDING_DIM", 768)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
            recall: RecallConfig {
                content_similarity_threshold: env_or(
                    "CONTENT_SIMILARITY_THRESHOLD",
                    DEFAULT_CONTENT_SIMILARITY_THRESHOLD,
                )?,
                content_limit: env_or("CONTENT_RECALL_LIMIT", DEFAULT_CONTENT_LIMIT)?,
            },
            diversity: DiversityConfig {
                similarity_threshold: env_or(
                    "DIVERSITY_SIMILARITY_THRESHOLD",
                    DEFAULT_SIMILARITY_THRESHOLD,
                )?,
                penalty_weight: env_or("DIVERSITY_PENALTY_WEIGHT", DEFAULT_PENALTY_WEIGHT)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let value: u16 = env_or("FEED_RANKING_TEST_UNSET_PORT", 8011).unwrap();
        assert_eq!(value, 8011);
    }

    #[test]
    fn test_env_or_parses_set_value() {
        env::set_var("FEED_RANKING_TEST_WEIGHT", "0.35");
        let value: f64 = env_or("FEED_RANKING_TEST_WEIGHT", DEFAULT_PENALTY_WEIGHT).unwrap();
        assert_eq!(value, 0.35);
        env::remove_var("FEED_RANKING_TEST_WEIGHT");
    }

    #[test]
    fn test_env_or_rejects_invalid_value() {
        env::set_var("FEED_RANKING_TEST_BAD_LIMIT", "ten");
        let result: Result<i64> = env_or("FEED_RANKING_TEST_BAD_LIMIT", DEFAULT_CONTENT_LIMIT);
        assert!(result.is_err());
        env::remove_var("FEED_RANKING_TEST_BAD_LIMIT");
    }

    #[test]
    fn test_ranking_defaults() {
        let recall = RecallConfig::default();
        assert_eq!(recall.content_similarity_threshold, 0.25);
        assert_eq!(recall.content_limit, 10);
        assert_eq!(
            recall.content_similarity_threshold,
            DEFAULT_CONTENT_SIMILARITY_THRESHOLD
        );
        assert_eq!(recall.content_limit, DEFAULT_CONTENT_LIMIT);

        let diversity = DiversityConfig::default();
        assert_eq!(diversity.similarity_threshold, 0.8);
        assert_eq!(diversity.penalty_weight, 0.2);
        assert_eq!(diversity.similarity_threshold, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(diversity.penalty_weight, DEFAULT_PENALTY_WEIGHT);
    }
}
