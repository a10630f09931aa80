use regex::Regex;
use std::sync::OnceLock;

use crate::models::{ClassificationResult, RiskTier};

/// Aggression, bite or rabies concerns
pub const BLOCK_KEYWORDS: &[&str] = &[
    "교상", "공격", "사납", "무는", "입질 심함", "광견", "심각한 공격성",
];

/// Active infectious disease, isolation, pending surgery
pub const HOLD_MEDICAL_KEYWORDS: &[&str] = &[
    "파보", "전염", "격리", "치료 중", "치료중", "수술 예정", "감염", "폐렴", "입원",
];

/// Separation anxiety, barking, house-training, pulling, guardedness
pub const LIMIT_BEHAVIOR_KEYWORDS: &[&str] = &[
    "분리불안",
    "지속 짖음",
    "짖음 심함",
    "배변 훈련 안됨",
    "활동량 많음",
    "견인 강함",
    "경계 심함",
    "산책 교육 필요",
];

pub const BEGINNER_FRIENDLY_KEYWORDS: &[&str] = &[
    "온순", "순함", "사람 좋아함", "착함", "순둥", "적응 빠름", "기본 훈련", "소형",
];

pub const HIGH_ACTIVITY_KEYWORDS: &[&str] = &["활발", "에너지", "산책 많이", "대형", "하이퍼", "견인"];

pub const MEDICATION_KEYWORDS: &[&str] = &["투약", "복약", "약 복용", "약 먹", "치료 중", "치료중"];

/// A risk rule: the first rule whose keyword set matches decides the tier
#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub tier: RiskTier,
    pub keywords: &'static [&'static str],
}

/// Risk rules in strict priority order. Text matching none of them is GREEN.
pub const RISK_RULES: &[RiskRule] = &[
    RiskRule {
        tier: RiskTier::Block,
        keywords: BLOCK_KEYWORDS,
    },
    RiskRule {
        tier: RiskTier::HoldMedical,
        keywords: HOLD_MEDICAL_KEYWORDS,
    },
    RiskRule {
        tier: RiskTier::LimitBehavior,
        keywords: LIMIT_BEHAVIOR_KEYWORDS,
    },
];

static NOISE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn noise_patterns() -> &'static Vec<Regex> {
    NOISE_PATTERNS.get_or_init(|| {
        [r"주소[:：].*", r"전화[:：].*", r"\d{2,4}-\d{2,4}-\d{3,4}"]
            .iter()
            .map(|p| Regex::new(p).expect("noise pattern is a valid regex"))
            .collect()
    })
}

/// Strip contact trailers and phone numbers, then collapse whitespace
pub fn clean_text(raw: &str) -> String {
    let mut text = raw.to_string();
    for pattern in noise_patterns() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[inline]
fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Classify a special-marks note.
///
/// Substring matching only, case-sensitive, first matching risk rule wins.
pub fn classify(raw: Option<&str>) -> ClassificationResult {
    let text = clean_text(raw.unwrap_or(""));
    if text.is_empty() {
        return ClassificationResult::default();
    }

    let medication_required = contains_any(&text, MEDICATION_KEYWORDS);
    let tier = RISK_RULES
        .iter()
        .find(|rule| contains_any(&text, rule.keywords))
        .map(|rule| rule.tier)
        .unwrap_or(RiskTier::Green);

    let (beginner_friendly, high_activity) = match tier {
        RiskTier::Block => (false, true),
        RiskTier::HoldMedical => (false, false),
        RiskTier::LimitBehavior => (false, contains_any(&text, HIGH_ACTIVITY_KEYWORDS)),
        RiskTier::Green => (
            contains_any(&text, BEGINNER_FRIENDLY_KEYWORDS),
            contains_any(&text, HIGH_ACTIVITY_KEYWORDS),
        ),
    };

    ClassificationResult {
        risk: tier,
        beginner_friendly,
        high_activity,
        medication_required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_green() {
        for raw in [None, Some(""), Some("   \n\t ")] {
            let result = classify(raw);
            assert_eq!(result.risk, RiskTier::Green);
            assert!(!result.beginner_friendly);
            assert!(!result.high_activity);
        }
    }

    #[test]
    fn test_block_wins_over_everything() {
        let result = classify(Some("온순하지만 가끔 공격 성향, 파보 치료중, 분리불안"));
        assert_eq!(result.risk, RiskTier::Block);
        assert!(!result.beginner_friendly);
        assert!(result.high_activity);
    }

    #[test]
    fn test_hold_medical_before_limit_behavior() {
        let result = classify(Some("격리 중이며 분리불안 있음, 활발함"));
        assert_eq!(result.risk, RiskTier::HoldMedical);
        assert!(!result.high_activity);
        assert!(!result.beginner_friendly);
    }

    #[test]
    fn test_limit_behavior_keeps_activity_flag() {
        let active = classify(Some("분리불안 있음, 매우 활발"));
        assert_eq!(active.risk, RiskTier::LimitBehavior);
        assert!(active.high_activity);
        assert!(!active.beginner_friendly);

        let calm = classify(Some("짖음 심함, 순함"));
        assert_eq!(calm.risk, RiskTier::LimitBehavior);
        assert!(!calm.high_activity);
        assert!(!calm.beginner_friendly);
    }

    #[test]
    fn test_green_flags() {
        let result = classify(Some("사람 좋아함, 산책 많이 필요"));
        assert_eq!(result.risk, RiskTier::Green);
        assert!(result.beginner_friendly);
        assert!(result.high_activity);
    }

    #[test]
    fn test_whitespace_is_normalized_before_matching() {
        let result = classify(Some("입질\n   심함"));
        assert_eq!(result.risk, RiskTier::Block);
    }

    #[test]
    fn test_noise_is_stripped() {
        assert_eq!(clean_text("순함 010-1234-5678 확인"), "순함 확인");
        assert_eq!(clean_text("온순함 주소: 공격동 1번지"), "온순함");
        assert_eq!(classify(Some("주소: 공격로 12")).risk, RiskTier::Green);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let keywords = &["Calm"];
        assert!(contains_any("Calm dog", keywords));
        assert!(!contains_any("calm dog", keywords));
    }

    #[test]
    fn test_medication_flag() {
        let result = classify(Some("피부병 투약 중"));
        assert!(result.medication_required);
        assert_eq!(result.risk, RiskTier::Green);
    }
}
