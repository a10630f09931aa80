use chrono::Datelike;

use crate::core::{
    classifier::classify,
    filters::{is_available, parse_age_years, size_hint, SizeHint},
    proximity::ProximityHeuristic,
};
use crate::models::{CandidateAnimal, ClassificationResult, ScoringWeights, SeniorPreference};

/// Ages at or below this count as young for the low-activity penalty
pub const YOUNG_AGE_MAX: u32 = 1;
/// Ages at or above this earn the senior-animal bonus
pub const SENIOR_AGE_MIN: u32 = 7;

/// Composite suitability score for one (candidate, preference) pair
///
/// Additive rules, each applied independently to a running total:
///
/// ```text
/// score = base(available ? 40 : 10)
///       - risk penalty (BLOCK 60, HOLD_MEDICAL 30, LIMIT_BEHAVIOR 15)
///       + 10 beginner-friendly
///       - 10 high activity when low activity is preferred
///       + 6  neutered
///       + 20 * proximity
///       + 5  small size when small size is preferred
///       - 6  age <= 1 when low activity is preferred, + 4 age >= 7
///       + 3  photo present
/// ```
///
/// The result is not clamped. Unparseable inputs contribute zero.
pub fn calculate_match_score(
    animal: &CandidateAnimal,
    preference: &SeniorPreference,
    weights: &ScoringWeights,
    proximity: &ProximityHeuristic,
    current_year: i32,
) -> (f64, ClassificationResult) {
    let classification = classify(Some(&animal.special_mark));

    let mut score = if is_available(animal.process_state.as_deref()) {
        weights.base_available
    } else {
        weights.base_unavailable
    };

    score -= weights.risk_penalty(classification.risk);

    if classification.beginner_friendly {
        score += weights.beginner_bonus;
    }

    if classification.high_activity && preference.prefers_low_activity {
        score -= weights.activity_mismatch_penalty;
    }

    if animal.neuter.is_yes() {
        score += weights.neuter_bonus;
    }

    score += weights.proximity * proximity.score(&preference.address, &animal.shelter_address);

    if preference.prefers_small_size && size_hint(&animal.kind) == Some(SizeHint::Small) {
        score += weights.small_size_bonus;
    }

    score += age_adjustment(animal, preference, weights, current_year);

    if animal.photo_url.as_deref().is_some_and(|p| !p.trim().is_empty()) {
        score += weights.photo_bonus;
    }

    (score, classification)
}

#[inline]
fn age_adjustment(
    animal: &CandidateAnimal,
    preference: &SeniorPreference,
    weights: &ScoringWeights,
    current_year: i32,
) -> f64 {
    match parse_age_years(&animal.age, current_year) {
        Some(age) if age <= YOUNG_AGE_MAX && preference.prefers_low_activity => {
            -weights.young_age_penalty
        }
        Some(age) if age >= SENIOR_AGE_MIN => weights.senior_age_bonus,
        _ => 0.0,
    }
}

/// Scorer bound to a rule table, a proximity strategy and a reference year
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ScoringWeights,
    proximity: ProximityHeuristic,
    reference_year: Option<i32>,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            proximity: ProximityHeuristic::default(),
            reference_year: None,
        }
    }

    pub fn with_proximity(mut self, proximity: ProximityHeuristic) -> Self {
        self.proximity = proximity;
        self
    }

    /// Pin the year used to turn birth years into ages
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn current_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Utc::now().year())
    }

    pub fn score(
        &self,
        animal: &CandidateAnimal,
        preference: &SeniorPreference,
    ) -> (f64, ClassificationResult) {
        calculate_match_score(
            animal,
            preference,
            &self.weights,
            &self.proximity,
            self.current_year(),
        )
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}
