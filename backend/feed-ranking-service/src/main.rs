use actix_web::{web, App, HttpServer};
use anyhow::Context;
use feed_ranking_service::db::{PgInteractionStore, PgVideoStore};
use feed_ranking_service::handlers::{get_feed, metrics_endpoint, FeedHandlerState};
use feed_ranking_service::services::recall::{PgContentSource, RedisCollaborativeSource};
use feed_ranking_service::{
    Config, DiversityLayer, RecallLayer, RecommendationEngine, ResultAssembler,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    info!(
        "Starting {} v{} on port {}",
        config.app.service_name,
        env!("CARGO_PKG_VERSION"),
        config.app.port
    );
    info!("Environment: {}", config.app.env);

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("failed to create database pool")?;

    let redis_client =
        redis::Client::open(config.redis.url.as_str()).context("failed to create Redis client")?;
    let redis_manager = redis::aio::ConnectionManager::new(redis_client)
        .await
        .context("failed to initialize Redis connection manager")?;

    let recall_layer = RecallLayer::new(
        Arc::new(RedisCollaborativeSource::new(redis_manager)),
        Arc::new(PgContentSource::new(
            db_pool.clone(),
            config.app.embedding_dim,
        )),
        config.recall.clone(),
    );
    let diversity_layer = DiversityLayer::new(
        config.diversity.similarity_threshold,
        config.diversity.penalty_weight,
    );
    let assembler = ResultAssembler::new(Arc::new(PgInteractionStore::new(db_pool.clone())));
    let engine = RecommendationEngine::new(
        recall_layer,
        Arc::new(PgVideoStore::new(db_pool)),
        diversity_layer,
        assembler,
    );

    let feed_state = web::Data::new(FeedHandlerState {
        engine: Arc::new(engine),
        request_timeout: Duration::from_millis(config.app.request_timeout_ms),
    });

    let bind_addr = ("0.0.0.0", config.app.port);
    info!("HTTP server listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(feed_state.clone())
            .service(get_feed)
            .service(metrics_endpoint)
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/api/v1/health", web::get().to(|| async { "OK" }))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
