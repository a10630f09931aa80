// Core algorithm exports
pub mod classifier;
pub mod error;
pub mod filters;
pub mod normalizer;
pub mod paging;
pub mod proximity;
pub mod ranker;
pub mod scoring;

pub use classifier::{classify, clean_text};
pub use error::EngineError;
pub use filters::{is_available, matches_availability, parse_age_years, size_hint, SizeHint};
pub use normalizer::{parse_reason_chips, RecordNormalizer};
pub use paging::{merge_pages, paginate, reconcile, total_pages, PageParams};
pub use proximity::{korean_region_key, proximity_score, ProximityHeuristic};
pub use ranker::{rank, sort_by_score_desc, RankOptions, Recommender};
pub use scoring::{calculate_match_score, Scorer};
