pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{RankingError, Result};
pub use services::{
    DiversityLayer, RecallLayer, RecommendationEngine, ResultAssembler, ScoreAggregator,
};
