// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AnimalId, CandidateAnimal, ClassificationResult, NeuterFlag, ReasonChip, RiskTier,
    ScoredCandidate, ScoringWeights, SeniorPreference, SexLabel,
};
pub use requests::{MergePagesRequest, RankRequest, RecommendPetsRequest};
pub use responses::{
    BatchSource, CandidateView, ErrorResponse, HealthResponse, PartialPage,
    RecommendationResponse, ResultPage,
};
