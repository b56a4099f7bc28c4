/// Feed API Handlers
///
/// HTTP surface over the recommendation engine. Authentication happens upstream;
/// the gateway forwards the authenticated user id in `x-user-id`.
use actix_web::{get, web, HttpRequest, HttpResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::{RankingError, Result};
use crate::metrics;
use crate::services::RecommendationEngine;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Handler state for the feed endpoint
pub struct FeedHandlerState {
    pub engine: Arc<RecommendationEngine>,
    pub request_timeout: Duration,
}

fn extract_user_id(req: &HttpRequest) -> Result<String> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RankingError::Unauthorized("Missing user ID".to_string()))
}

/// GET /api/v1/feed
/// Ranked recommendations for the requesting user
#[get("/api/v1/feed")]
pub async fn get_feed(
    req: HttpRequest,
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let user_id = extract_user_id(&req)?;
    debug!("Getting feed for user: {}", user_id);

    let timeout_ms = state.request_timeout.as_millis() as u64;
    let outcome = tokio::time::timeout(
        state.request_timeout,
        state.engine.generate_recommendations(&user_id),
    )
    .await;

    match outcome {
        Ok(Ok(videos)) => {
            metrics::record_request("success");
            Ok(HttpResponse::Ok().json(videos))
        }
        Ok(Err(e)) => {
            metrics::record_request("error");
            error!(user_id = %user_id, error = %e, "Error fetching videos");
            Err(e)
        }
        Err(_) => {
            metrics::record_request("timeout");
            warn!(user_id = %user_id, timeout_ms, "Recommendation computation timed out");
            Err(RankingError::Timeout(timeout_ms))
        }
    }
}

/// GET /metrics
#[get("/metrics")]
pub async fn metrics_endpoint() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_user_id() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "user_123"))
            .to_http_request();
        assert_eq!(extract_user_id(&req).unwrap(), "user_123");
    }

    #[test]
    fn test_extract_user_id_missing_or_blank() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            extract_user_id(&req),
            Err(RankingError::Unauthorized(_))
        ));

        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "   "))
            .to_http_request();
        assert!(extract_user_id(&req).is_err());
    }
}
