// Unit tests for MatchPet Reco

use matchpet_reco::core::{
    classifier::classify,
    filters::{is_available, parse_age_years, size_hint, SizeHint},
    normalizer::{parse_reason_chips, RecordNormalizer},
    paging::{merge_pages, paginate, reconcile, total_pages, PageParams},
    proximity::{proximity_score, ProximityHeuristic},
    scoring::{calculate_match_score, Scorer},
};
use matchpet_reco::models::{
    AnimalId, CandidateAnimal, NeuterFlag, PartialPage, RiskTier, ScoringWeights, SeniorPreference,
    SexLabel,
};
use matchpet_reco::services::UrlResolver;
use serde_json::json;

fn create_test_animal() -> CandidateAnimal {
    CandidateAnimal {
        id: Some(AnimalId::Text("448567202500123".to_string())),
        kind: "[개] 믹스견".to_string(),
        process_state: Some("보호중".to_string()),
        neuter: NeuterFlag::Yes,
        shelter_address: "부산광역시 사하구 다대로 1".to_string(),
        special_mark: "목줄 착용".to_string(),
        ..Default::default()
    }
}

fn create_test_preference() -> SeniorPreference {
    SeniorPreference {
        senior_id: Some(42),
        address: "부산광역시 사하구 하단동".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_classify_empty_note_is_green() {
    let result = classify(None);
    assert_eq!(result.risk, RiskTier::Green);
    assert!(!result.beginner_friendly);
    assert!(!result.high_activity);

    assert_eq!(classify(Some("   ")).risk, RiskTier::Green);
}

#[test]
fn test_classify_block_wins_over_everything() {
    let result = classify(Some("온순하지만 교상 이력, 파보 완치, 분리불안"));
    assert_eq!(result.risk, RiskTier::Block);
    assert!(!result.beginner_friendly);
    assert!(result.high_activity);
}

#[test]
fn test_classify_medical_beats_behavior() {
    let result = classify(Some("격리 치료 중, 분리불안"));
    assert_eq!(result.risk, RiskTier::HoldMedical);
    assert!(!result.beginner_friendly);
    assert!(!result.high_activity);
    assert!(result.medication_required);
}

#[test]
fn test_classify_limit_behavior_keeps_activity_flag() {
    let result = classify(Some("짖음 심함, 에너지 넘침"));
    assert_eq!(result.risk, RiskTier::LimitBehavior);
    assert!(!result.beginner_friendly);
    assert!(result.high_activity);
}

#[test]
fn test_classify_ignores_contact_trailer() {
    // "공격" appears only in the address trailer, which is stripped
    let result = classify(Some("순함 주소: 공격로 12"));
    assert_eq!(result.risk, RiskTier::Green);
    assert!(result.beginner_friendly);
}

#[test]
fn test_proximity_buckets() {
    let home = "서울특별시 마포구 합정동";
    assert_eq!(proximity_score(home, "서울특별시 마포구 망원동 10"), 1.0);
    assert_eq!(proximity_score(home, "서울특별시 은평구"), 0.6);
    assert_eq!(proximity_score(home, "경기도 고양시 덕양구"), 0.2);
    assert_eq!(proximity_score(home, ""), 0.0);
    assert_eq!(proximity_score("", home), 0.0);
}

#[test]
fn test_proximity_pluggable_region_key() {
    fn first_token(address: &str) -> String {
        address.split(',').next().unwrap_or("").trim().to_string()
    }
    let heuristic = ProximityHeuristic::new(first_token);
    assert_eq!(heuristic.score("Springfield, IL", "Springfield, MO"), 1.0);
}

#[test]
fn test_available_states() {
    assert!(is_available(Some("보호중")));
    assert!(is_available(Some("공고중")));
    assert!(is_available(Some("available")));
    assert!(is_available(None));
    assert!(!is_available(Some("종료(자연사)")));
    assert!(!is_available(Some("UNAVAILABLE")));
    assert!(!is_available(Some("not available")));
}

#[test]
fn test_negated_status_gets_unavailable_base() {
    let scorer = Scorer::default().with_reference_year(2025);
    let mut animal = create_test_animal();
    animal.process_state = Some("UNAVAILABLE".to_string());

    let (score, _) = scorer.score(&animal, &create_test_preference());
    // 10 unavailable base + 6 neuter + 20 proximity
    assert_eq!(score, 36.0);
}

#[test]
fn test_size_and_age_hints() {
    assert_eq!(size_hint("[개] 포메라니안"), Some(SizeHint::Small));
    assert_eq!(size_hint("[개] 골든 리트리버"), Some(SizeHint::Large));
    assert_eq!(parse_age_years("2018(년생)", 2025), Some(7));
    assert_eq!(parse_age_years("3살", 2025), Some(3));
    assert_eq!(parse_age_years("나이 미상", 2025), None);
}

#[test]
fn test_normalize_open_data_record() {
    let normalizer = RecordNormalizer::new(UrlResolver::new("https://matchpet.test"));
    let animal = normalizer.normalize(&json!({
        "desertionNo": "448567202500123",
        "kindCd": "[개] 믹스견",
        "age": "2023(년생)",
        "sexCd": "M",
        "neuterYn": "U",
        "processState": "보호중",
        "careNm": "사하구 보호소",
        "careAddr": "부산광역시 사하구 다대로 1",
        "popfile": "/uploads/448567.jpg",
        "specialMark": "목줄 착용"
    }));

    assert_eq!(animal.id, Some(AnimalId::Text("448567202500123".to_string())));
    assert_eq!(animal.breed.as_deref(), Some("믹스견"));
    assert_eq!(animal.sex, SexLabel::Male);
    assert_eq!(animal.neuter, NeuterFlag::Unspecified(None));
    assert_eq!(animal.photo_url.as_deref(), Some("https://matchpet.test/uploads/448567.jpg"));
}

#[test]
fn test_normalize_alias_priority() {
    let normalizer = RecordNormalizer::default();
    let animal = normalizer.normalize(&json!({
        "petId": 7,
        "id": null,
        "species": "고양이",
        "kind": "[고양이] 페르시안",
        "status": "종료(입양)"
    }));

    assert_eq!(animal.id, Some(AnimalId::Number(7)));
    assert_eq!(animal.kind, "[고양이] 페르시안");
    assert_eq!(animal.process_state.as_deref(), Some("종료(입양)"));
}

#[test]
fn test_reason_chips() {
    let chips = parse_reason_chips("가까운 보호소(+20), 중성화 +6 | 사진 있음");
    assert_eq!(chips.len(), 3);
    assert_eq!(chips[0].label, "가까운 보호소");
    assert_eq!(chips[0].delta, Some(20.0));
    assert_eq!(chips[1].label, "중성화");
    assert_eq!(chips[1].delta, Some(6.0));
    assert_eq!(chips[2].label, "사진 있음");
    assert_eq!(chips[2].delta, None);
}

#[test]
fn test_end_to_end_score_is_66() {
    let (score, classification) = calculate_match_score(
        &create_test_animal(),
        &create_test_preference(),
        &ScoringWeights::default(),
        &ProximityHeuristic::default(),
        2025,
    );
    assert_eq!(score, 66.0);
    assert_eq!(classification.risk, RiskTier::Green);
}

#[test]
fn test_block_note_lowers_score_by_sixty() {
    let scorer = Scorer::default().with_reference_year(2025);
    let preference = create_test_preference();
    let baseline = scorer.score(&create_test_animal(), &preference).0;

    let mut animal = create_test_animal();
    animal.special_mark = "사람을 무는 습관".to_string();
    let (blocked, classification) = scorer.score(&animal, &preference);

    assert_eq!(classification.risk, RiskTier::Block);
    assert_eq!(baseline - blocked, 60.0);
}

#[test]
fn test_custom_weights_apply() {
    let weights = ScoringWeights {
        neuter_bonus: 0.0,
        proximity: 0.0,
        ..ScoringWeights::default()
    };
    let score = Scorer::new(weights)
        .with_reference_year(2025)
        .score(&create_test_animal(), &create_test_preference())
        .0;
    assert_eq!(score, 40.0);
}

#[test]
fn test_total_pages_formula() {
    assert_eq!(total_pages(0, 12), 1);
    assert_eq!(total_pages(12, 12), 1);
    assert_eq!(total_pages(13, 12), 2);
}

#[test]
fn test_every_page_keeps_empty_flag_in_sync() {
    for page in 0..5 {
        let result = paginate((0..9).collect::<Vec<u32>>(), PageParams { page, size: 4 });
        assert_eq!(result.empty, result.content.is_empty());
    }

    let mut partial = PartialPage::from_content(Vec::<u32>::new());
    partial.empty = Some(false);
    let reconciled = reconcile(partial, PageParams::default());
    assert!(reconciled.empty);
}

#[test]
fn test_merge_in_steps_equals_merge_at_once() {
    let params = |page| PageParams { page, size: 3 };
    let all: Vec<u32> = (0..9).collect();
    let pages: Vec<_> = (0..3).map(|p| paginate(all.clone(), params(p))).collect();

    let merged = pages
        .iter()
        .cloned()
        .fold(None, |acc, page| Some(merge_pages(acc, page)));
    let merged = merged.unwrap();

    assert_eq!(merged.content, all);
    assert!(merged.last);
    assert_eq!(merged.number, 2);
}
