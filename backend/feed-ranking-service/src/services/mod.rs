pub mod aggregation;
pub mod assembler;
pub mod diversity;
pub mod engine;
pub mod recall;

pub use aggregation::{MergedScores, ScoreAggregator};
pub use assembler::ResultAssembler;
pub use diversity::DiversityLayer;
pub use engine::RecommendationEngine;
pub use recall::{CollaborativeSource, ContentSource, RecallLayer};
