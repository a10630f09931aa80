//! MatchPet Reco - recommendation scoring and ranking for the MatchPet adoption service
//!
//! The engine turns heterogeneous shelter records into ranked, paged
//! candidates for one senior adopter's preference:
//! normalize, classify notes, score, stable-rank, paginate.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{classify, merge_pages, proximity_score, EngineError, PageParams, RankOptions, Recommender, RecordNormalizer, Scorer};
pub use crate::models::{CandidateAnimal, ClassificationResult, ResultPage, RiskTier, ScoredCandidate, ScoringWeights, SeniorPreference};
