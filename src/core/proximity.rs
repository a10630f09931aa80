use regex::Regex;
use std::sync::OnceLock;

/// Affinity when both addresses reduce to the same region key
pub const SAME_REGION: f64 = 1.0;
/// Affinity when only the top-level region matches
pub const SAME_TOP_LEVEL: f64 = 0.6;
/// Affinity for any two non-empty addresses
pub const DIFFERENT_REGION: f64 = 0.2;

/// Strategy reducing an address to a coarse region key
pub type RegionKeyFn = fn(&str) -> String;

static PROVINCE_DISTRICT: OnceLock<Regex> = OnceLock::new();

fn province_district() -> &'static Regex {
    PROVINCE_DISTRICT.get_or_init(|| {
        Regex::new(
            r"([가-힣]{2,10}(?:특별자치시|특별자치도|특별시|광역시|도))\s+([가-힣]{1,10}(?:시|군|구))",
        )
        .expect("province/district pattern is a valid regex")
    })
}

/// Region key following the Korean `<province> <district>` convention,
/// falling back to the first two whitespace-delimited tokens.
pub fn korean_region_key(address: &str) -> String {
    if let Some(caps) = province_district().captures(address) {
        return format!("{} {}", &caps[1], &caps[2]);
    }
    address
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Coarse three-bucket address affinity.
///
/// This is a string heuristic, not a distance: equal region keys score 1.0,
/// equal top-level regions 0.6, anything else 0.2, and 0.0 when either
/// address is blank.
#[derive(Debug, Clone, Copy)]
pub struct ProximityHeuristic {
    region_key: RegionKeyFn,
}

impl ProximityHeuristic {
    pub fn new(region_key: RegionKeyFn) -> Self {
        Self { region_key }
    }

    pub fn region_key(&self, address: &str) -> String {
        (self.region_key)(address)
    }

    pub fn score(&self, adopter_address: &str, shelter_address: &str) -> f64 {
        if adopter_address.trim().is_empty() || shelter_address.trim().is_empty() {
            return 0.0;
        }

        let a = self.region_key(adopter_address);
        let b = self.region_key(shelter_address);
        if a == b {
            return SAME_REGION;
        }

        match (a.split_whitespace().next(), b.split_whitespace().next()) {
            (Some(top_a), Some(top_b)) if top_a == top_b => SAME_TOP_LEVEL,
            _ => DIFFERENT_REGION,
        }
    }
}

impl Default for ProximityHeuristic {
    fn default() -> Self {
        Self::new(korean_region_key)
    }
}

/// Proximity using the default Korean region keys
#[inline]
pub fn proximity_score(adopter_address: &str, shelter_address: &str) -> f64 {
    ProximityHeuristic::default().score(adopter_address, shelter_address)
}
