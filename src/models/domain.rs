use serde::{Deserialize, Serialize};
use std::fmt;

/// Animal identifier as delivered upstream, either numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimalId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimalId::Number(n) => write!(f, "{}", n),
            AnimalId::Text(s) => f.write_str(s),
        }
    }
}

/// Sex label after code normalization (`M`/`F`, everything else unknown)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SexLabel {
    Male,
    Female,
    #[default]
    Unknown,
}

impl SexLabel {
    pub fn from_code(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "M" => SexLabel::Male,
            "F" => SexLabel::Female,
            _ => SexLabel::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SexLabel::Male => "수컷",
            SexLabel::Female => "암컷",
            SexLabel::Unknown => "미상",
        }
    }
}

/// Neuter flag. `Unspecified` keeps the raw value only when it was a free
/// string rather than a short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeuterFlag {
    Yes,
    No,
    Unspecified(Option<String>),
}

impl Default for NeuterFlag {
    fn default() -> Self {
        NeuterFlag::Unspecified(None)
    }
}

impl NeuterFlag {
    pub fn from_code(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("Y") {
            return NeuterFlag::Yes;
        }
        if trimmed.eq_ignore_ascii_case("N") {
            return NeuterFlag::No;
        }
        // Single characters and dashes are codes (U, Q, -), not descriptions
        if trimmed.chars().count() <= 1 || trimmed.chars().all(|c| c == '-') {
            NeuterFlag::Unspecified(None)
        } else {
            NeuterFlag::Unspecified(Some(trimmed.to_string()))
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, NeuterFlag::Yes)
    }

    pub fn label(&self) -> &str {
        match self {
            NeuterFlag::Yes => "예",
            NeuterFlag::No => "아니오",
            NeuterFlag::Unspecified(Some(raw)) => raw,
            NeuterFlag::Unspecified(None) => "미상",
        }
    }
}

/// `{label, delta}` chip parsed out of a free-text recommendation reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonChip {
    pub label: String,
    pub delta: Option<f64>,
}

/// Canonical animal record produced by the normalizer.
///
/// Every field has a fallback, so a normalized record is always complete
/// even when the upstream record was empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnimal {
    pub id: Option<AnimalId>,
    pub name: Option<String>,
    /// Raw kind/breed code, used for the size hint
    pub kind: String,
    /// Display breed with numeric codes and bracket prefixes removed
    pub breed: Option<String>,
    pub age: String,
    pub sex: SexLabel,
    pub neuter: NeuterFlag,
    pub process_state: Option<String>,
    pub shelter_name: String,
    pub shelter_address: String,
    pub shelter_tel: String,
    pub color: String,
    pub photo_url: Option<String>,
    pub special_mark: String,
    pub weight: Option<String>,
    pub upstream_score: Option<f64>,
    pub reason: Vec<ReasonChip>,
}

/// Adopter preferences. Absent flags are false, nothing else is defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeniorPreference {
    pub senior_id: Option<i64>,
    #[serde(alias = "city")]
    pub address: String,
    #[serde(alias = "lowActivity")]
    pub prefers_low_activity: bool,
    #[serde(alias = "smallSize")]
    pub prefers_small_size: bool,
    pub preferred_species: Option<String>,
}

/// Risk tier derived from special-marks text, in descending severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Block,
    HoldMedical,
    LimitBehavior,
    #[default]
    Green,
}

/// Behavior classification of a special-marks note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub risk: RiskTier,
    pub beginner_friendly: bool,
    pub high_activity: bool,
    pub medication_required: bool,
}

/// Candidate with its score for one preference context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub animal: CandidateAnimal,
    pub score: f64,
    pub classification: ClassificationResult,
    pub available: bool,
}

/// Additive scoring rule table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub base_available: f64,
    pub base_unavailable: f64,
    pub block_penalty: f64,
    pub hold_medical_penalty: f64,
    pub limit_behavior_penalty: f64,
    pub beginner_bonus: f64,
    pub activity_mismatch_penalty: f64,
    pub neuter_bonus: f64,
    pub proximity: f64,
    pub small_size_bonus: f64,
    pub young_age_penalty: f64,
    pub senior_age_bonus: f64,
    pub photo_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base_available: 40.0,
            base_unavailable: 10.0,
            block_penalty: 60.0,
            hold_medical_penalty: 30.0,
            limit_behavior_penalty: 15.0,
            beginner_bonus: 10.0,
            activity_mismatch_penalty: 10.0,
            neuter_bonus: 6.0,
            proximity: 20.0,
            small_size_bonus: 5.0,
            young_age_penalty: 6.0,
            senior_age_bonus: 4.0,
            photo_bonus: 3.0,
        }
    }
}

impl ScoringWeights {
    /// Penalty subtracted for a risk tier
    pub fn risk_penalty(&self, risk: RiskTier) -> f64 {
        match risk {
            RiskTier::Block => self.block_penalty,
            RiskTier::HoldMedical => self.hold_medical_penalty,
            RiskTier::LimitBehavior => self.limit_behavior_penalty,
            RiskTier::Green => 0.0,
        }
    }
}
