use serde::{Deserialize, Serialize};

use crate::models::domain::{AnimalId, ReasonChip, RiskTier, ScoredCandidate};

/// Canonical paginated envelope.
///
/// `empty` always mirrors `content.is_empty()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

/// Partially populated page descriptor as returned by upstream services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPage<T> {
    #[serde(default, alias = "items")]
    pub content: Vec<T>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default, alias = "total")]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub first: Option<bool>,
    #[serde(default)]
    pub last: Option<bool>,
    #[serde(default)]
    pub empty: Option<bool>,
}

impl<T> PartialPage<T> {
    /// Descriptor carrying only content, every other field to be backfilled
    pub fn from_content(content: Vec<T>) -> Self {
        Self {
            content,
            number: None,
            size: None,
            total_elements: None,
            total_pages: None,
            first: None,
            last: None,
            empty: None,
        }
    }
}

/// Display-ready projection of a scored candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub id: Option<AnimalId>,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub kind: String,
    pub age: String,
    pub sex: String,
    pub neuter: String,
    pub status: Option<String>,
    pub available: bool,
    pub shelter_name: String,
    pub shelter_address: String,
    pub shelter_tel: String,
    pub color: String,
    pub photo_url: Option<String>,
    pub special_mark: String,
    pub weight: Option<String>,
    pub match_score: f64,
    pub upstream_score: Option<f64>,
    pub risk: RiskTier,
    pub beginner_friendly: bool,
    pub high_activity: bool,
    pub medication_required: bool,
    pub reason_chips: Vec<ReasonChip>,
}

impl From<ScoredCandidate> for CandidateView {
    fn from(scored: ScoredCandidate) -> Self {
        let ScoredCandidate {
            animal,
            score,
            classification,
            available,
        } = scored;

        Self {
            sex: animal.sex.label().to_string(),
            neuter: animal.neuter.label().to_string(),
            id: animal.id,
            name: animal.name,
            breed: animal.breed,
            kind: animal.kind,
            age: animal.age,
            status: animal.process_state,
            available,
            shelter_name: animal.shelter_name,
            shelter_address: animal.shelter_address,
            shelter_tel: animal.shelter_tel,
            color: animal.color,
            photo_url: animal.photo_url,
            special_mark: animal.special_mark,
            weight: animal.weight,
            match_score: score,
            upstream_score: animal.upstream_score,
            risk: classification.risk,
            beginner_friendly: classification.beginner_friendly,
            high_activity: classification.high_activity,
            medication_required: classification.medication_required,
            reason_chips: animal.reason,
        }
    }
}

/// Where a recommendation batch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchSource {
    Request,
    Upstream,
    Snapshot,
    Demo,
}

/// Response for the recommendation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub page: ResultPage<CandidateView>,
    pub source: BatchSource,
    pub request_id: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
