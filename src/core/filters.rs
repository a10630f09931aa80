use regex::Regex;
use std::sync::OnceLock;

use crate::models::CandidateAnimal;

/// Korean process-state fragments meaning the animal can still be adopted
pub const AVAILABLE_FRAGMENTS: &[&str] = &["보호중", "공고중"];

pub const LARGE_KIND_HINTS: &[&str] = &[
    "대형", "리트리버", "셰퍼드", "진돗", "허스키", "말라뮤트", "도베르만", "large",
];
pub const MEDIUM_KIND_HINTS: &[&str] = &["중형", "코기", "시바", "비글", "보더", "스피츠", "medium"];
pub const SMALL_KIND_HINTS: &[&str] = &[
    "소형", "말티즈", "푸들", "치와와", "포메", "시츄", "요크", "닥스", "small",
];

/// Coarse body size inferred from a kind/breed code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeHint {
    Large,
    Medium,
    Small,
}

static AVAILABLE_TOKEN: OnceLock<Regex> = OnceLock::new();
static AGE_YEARS: OnceLock<Regex> = OnceLock::new();
static BIRTH_YEAR: OnceLock<Regex> = OnceLock::new();

/// Whole-word status tokens, capturing a leading `NOT`
fn available_token() -> &'static Regex {
    AVAILABLE_TOKEN.get_or_init(|| {
        Regex::new(r"\b(NOT[\s-]+)?(?:AVAILABLE|OPEN|PROTECT(?:ED|ION)?)\b")
            .expect("status pattern is a valid regex")
    })
}

fn age_years() -> &'static Regex {
    AGE_YEARS.get_or_init(|| {
        Regex::new(r"^(\d{1,2})\s*(?:살|세|y|yr|yrs|years?)?$").expect("age pattern is a valid regex")
    })
}

fn birth_year() -> &'static Regex {
    BIRTH_YEAR.get_or_init(|| {
        Regex::new(r"^(\d{4})(?:\D|$)").expect("birth year pattern is a valid regex")
    })
}

/// Whether a process state counts as available. A missing or blank state
/// is treated as available.
#[inline]
pub fn is_available(process_state: Option<&str>) -> bool {
    let state = match process_state.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return true,
    };
    if AVAILABLE_FRAGMENTS.iter().any(|k| state.contains(k)) {
        return true;
    }
    let upper = state.to_uppercase();
    available_token()
        .captures_iter(&upper)
        .any(|caps| caps.get(1).is_none())
}

/// Size hint from the kind code, checking large, medium, then small
pub fn size_hint(kind: &str) -> Option<SizeHint> {
    let lower = kind.to_lowercase();
    let matches = |hints: &[&str]| hints.iter().any(|h| lower.contains(h));

    if matches(LARGE_KIND_HINTS) {
        Some(SizeHint::Large)
    } else if matches(MEDIUM_KIND_HINTS) {
        Some(SizeHint::Medium)
    } else if matches(SMALL_KIND_HINTS) {
        Some(SizeHint::Small)
    } else {
        None
    }
}

/// Age in years from a bare integer (`"3"`, `"3살"`) or a four-digit birth
/// year (`"2019(년생)"`) relative to `current_year`. Anything else is `None`.
pub fn parse_age_years(age: &str, current_year: i32) -> Option<u32> {
    let trimmed = age.trim();
    if let Some(caps) = birth_year().captures(trimmed) {
        let year: i32 = caps[1].parse().ok()?;
        if year > current_year {
            return None;
        }
        return u32::try_from(current_year - year).ok();
    }
    age_years()
        .captures(trimmed)
        .and_then(|caps| caps[1].parse().ok())
}

/// Keep only candidates whose process state counts as available
#[inline]
pub fn matches_availability(animal: &CandidateAnimal) -> bool {
    is_available(animal.process_state.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_states() {
        assert!(is_available(Some("보호중")));
        assert!(is_available(Some("available")));
        assert!(is_available(Some("[공고중] 2025-01-01")));
        assert!(is_available(None));
        assert!(is_available(Some("  ")));
        assert!(!is_available(Some("종료(입양)")));
        assert!(!is_available(Some("ADOPTED")));
    }

    #[test]
    fn test_negated_states_are_unavailable() {
        assert!(!is_available(Some("UNAVAILABLE")));
        assert!(!is_available(Some("not available")));
        assert!(!is_available(Some("NOT_AVAILABLE")));
        assert!(!is_available(Some("REOPENED")));
        assert!(is_available(Some("OPEN")));
        assert!(is_available(Some("protected")));
        assert!(is_available(Some("status: available")));
    }

    #[test]
    fn test_size_hint_priority() {
        assert_eq!(size_hint("[개] 말티즈"), Some(SizeHint::Small));
        assert_eq!(size_hint("[개] 골든 리트리버"), Some(SizeHint::Large));
        assert_eq!(size_hint("[개] 웰시코기 믹스"), Some(SizeHint::Medium));
        assert_eq!(size_hint("Small mixed"), Some(SizeHint::Small));
        // Large wins when several hints appear
        assert_eq!(size_hint("대형 푸들"), Some(SizeHint::Large));
        assert_eq!(size_hint("[고양이] 코리안숏헤어"), None);
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age_years("3", 2025), Some(3));
        assert_eq!(parse_age_years("7살", 2025), Some(7));
        assert_eq!(parse_age_years("2019(년생)", 2025), Some(6));
        assert_eq!(parse_age_years("2025(60일미만)(년생)", 2025), Some(0));
        assert_eq!(parse_age_years("2030", 2025), None);
        assert_eq!(parse_age_years("", 2025), None);
        assert_eq!(parse_age_years("어림", 2025), None);
        assert_eq!(parse_age_years("60일미만", 2025), None);
    }
}
