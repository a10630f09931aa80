use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::models::{AnimalId, CandidateAnimal, NeuterFlag, ReasonChip, SexLabel};
use crate::services::UrlResolver;

// Alias lists per canonical field, tried in order; the first non-null wins.
pub const ID_FIELDS: &[&str] = &[
    "id",
    "petId",
    "animalId",
    "desertionNo",
    "desertion_no",
    "noticeNo",
    "seq",
];
pub const NAME_FIELDS: &[&str] = &["name", "petName", "animalName"];
pub const KIND_FIELDS: &[&str] = &["kindCd", "kind", "breed", "species", "kindNm"];
pub const AGE_FIELDS: &[&str] = &["age"];
pub const SEX_FIELDS: &[&str] = &["sexCd", "sex", "gender"];
pub const NEUTER_FIELDS: &[&str] = &["neuterYn", "neuter", "neutered"];
pub const PROCESS_STATE_FIELDS: &[&str] = &["processState", "status", "state"];
pub const SHELTER_NAME_FIELDS: &[&str] = &["careNm", "shelterName", "orgNm"];
pub const SHELTER_ADDRESS_FIELDS: &[&str] = &["careAddr", "shelterAddr", "address", "orgAddr"];
pub const SHELTER_TEL_FIELDS: &[&str] = &["careTel", "shelterTel"];
pub const COLOR_FIELDS: &[&str] = &["colorCd", "color"];
pub const PHOTO_FIELDS: &[&str] = &["popfile", "photoUrl", "filename", "thumb", "image", "imageUrl"];
pub const SPECIAL_MARK_FIELDS: &[&str] = &["specialMark", "special_mark", "note", "memo"];
pub const WEIGHT_FIELDS: &[&str] = &["weight"];
pub const SCORE_FIELDS: &[&str] = &["matchScore", "score", "match_score"];
pub const REASON_FIELDS: &[&str] = &["reason", "reasons"];

/// Characters separating chunks of a recommendation reason
pub const REASON_DELIMITERS: &[char] = &[',', ';', '|', '·', '\n'];

static REASON_DELTA: OnceLock<Regex> = OnceLock::new();
static BREED_PREFIX: OnceLock<Regex> = OnceLock::new();

fn reason_delta() -> &'static Regex {
    REASON_DELTA.get_or_init(|| {
        Regex::new(r"^(?P<label>.*?)[\s:]*\(?(?P<delta>[+-]\d+(?:\.\d+)?)\)?$")
            .expect("reason delta pattern is a valid regex")
    })
}

fn breed_prefix() -> &'static Regex {
    BREED_PREFIX.get_or_init(|| {
        Regex::new(r"^\[[^\]]+\]\s*").expect("breed prefix pattern is a valid regex")
    })
}

/// First non-null value among `fields`, in order
pub fn first_present<'a>(record: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    let object = record.as_object()?;
    fields
        .iter()
        .find_map(|field| object.get(*field).filter(|v| !v.is_null()))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First non-null value among `fields` rendered as text. Arrays and
/// objects are not text and yield `None`.
pub fn first_text(record: &Value, fields: &[&str]) -> Option<String> {
    first_present(record, fields).and_then(scalar_text)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Identifier by alias priority; blank strings count as missing
pub fn resolve_id(record: &Value) -> Option<AnimalId> {
    let object = record.as_object()?;
    ID_FIELDS.iter().find_map(|field| match object.get(*field)? {
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => AnimalId::Number(i),
            None => AnimalId::Text(n.to_string()),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(AnimalId::Text(s.trim().to_string())),
        _ => None,
    })
}

fn resolve_neuter(record: &Value) -> NeuterFlag {
    match first_present(record, NEUTER_FIELDS) {
        Some(Value::Bool(true)) => NeuterFlag::Yes,
        Some(Value::Bool(false)) => NeuterFlag::No,
        Some(other) => scalar_text(other)
            .map(|raw| NeuterFlag::from_code(&raw))
            .unwrap_or_default(),
        None => NeuterFlag::default(),
    }
}

fn resolve_score(record: &Value) -> Option<f64> {
    match first_present(record, SCORE_FIELDS)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn resolve_reason(record: &Value) -> Vec<ReasonChip> {
    match first_present(record, REASON_FIELDS) {
        Some(Value::String(s)) => parse_reason_chips(s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .flat_map(|s| parse_reason_chips(&s))
            .collect(),
        _ => Vec::new(),
    }
}

/// Display breed from a kind code: numeric codes are dropped and a leading
/// bracketed species prefix such as `[개]` is removed.
pub fn sanitize_breed(kind: &str) -> Option<String> {
    let trimmed = kind.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let stripped = breed_prefix().replace(trimmed, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Split a free-text reason into `{label, delta}` chips.
///
/// Best effort: chunks without a trailing signed number become label-only
/// chips, and no input makes this fail.
pub fn parse_reason_chips(text: &str) -> Vec<ReasonChip> {
    text.split(REASON_DELIMITERS)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let parsed = reason_delta().captures(chunk).and_then(|caps| {
                let label = caps.name("label")?.as_str().trim();
                let delta = caps.name("delta")?.as_str().parse::<f64>().ok()?;
                (!label.is_empty()).then(|| ReasonChip {
                    label: label.to_string(),
                    delta: Some(delta),
                })
            });
            parsed.unwrap_or_else(|| ReasonChip {
                label: chunk.to_string(),
                delta: None,
            })
        })
        .collect()
}

/// Maps arbitrarily shaped upstream records to [`CandidateAnimal`]
#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    resolver: UrlResolver,
}

impl RecordNormalizer {
    pub fn new(resolver: UrlResolver) -> Self {
        Self { resolver }
    }

    /// Normalize one record. Total: any JSON value, including non-objects,
    /// produces a complete record with fallbacks filled in.
    pub fn normalize(&self, record: &Value) -> CandidateAnimal {
        let kind = first_text(record, KIND_FIELDS).unwrap_or_default();
        let photo_url = non_blank(first_text(record, PHOTO_FIELDS))
            .map(|raw| self.resolver.resolve(&raw))
            .filter(|url| !url.is_empty());

        CandidateAnimal {
            id: resolve_id(record),
            name: non_blank(first_text(record, NAME_FIELDS)),
            breed: sanitize_breed(&kind),
            kind,
            age: first_text(record, AGE_FIELDS).unwrap_or_default(),
            sex: first_text(record, SEX_FIELDS)
                .map(|raw| SexLabel::from_code(&raw))
                .unwrap_or_default(),
            neuter: resolve_neuter(record),
            process_state: non_blank(first_text(record, PROCESS_STATE_FIELDS)),
            shelter_name: first_text(record, SHELTER_NAME_FIELDS).unwrap_or_default(),
            shelter_address: first_text(record, SHELTER_ADDRESS_FIELDS).unwrap_or_default(),
            shelter_tel: first_text(record, SHELTER_TEL_FIELDS).unwrap_or_default(),
            color: first_text(record, COLOR_FIELDS).unwrap_or_default(),
            photo_url,
            special_mark: first_text(record, SPECIAL_MARK_FIELDS).unwrap_or_default(),
            weight: non_blank(first_text(record, WEIGHT_FIELDS)),
            upstream_score: resolve_score(record),
            reason: resolve_reason(record),
        }
    }

    pub fn normalize_all(&self, records: &[Value]) -> Vec<CandidateAnimal> {
        records.iter().map(|r| self.normalize(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalizer() -> RecordNormalizer {
        RecordNormalizer::new(UrlResolver::new("http://localhost:8080/api"))
    }

    #[test]
    fn test_empty_object_normalizes_to_defaults() {
        let animal = normalizer().normalize(&json!({}));
        assert_eq!(animal, CandidateAnimal::default());
        assert_eq!(animal.sex, SexLabel::Unknown);
        assert_eq!(animal.neuter, NeuterFlag::Unspecified(None));
    }

    #[test]
    fn test_non_object_inputs_are_absorbed() {
        for record in [json!(null), json!([1, 2]), json!("dog"), json!(42)] {
            let animal = normalizer().normalize(&record);
            assert_eq!(animal.id, None);
            assert_eq!(animal.kind, "");
        }
    }

    #[test]
    fn test_id_alias_priority() {
        let animal = normalizer().normalize(&json!({"petId": 9, "id": 5}));
        assert_eq!(animal.id, Some(AnimalId::Number(5)));

        let animal = normalizer().normalize(&json!({"id": null, "desertionNo": "448548202500123", "seq": 3}));
        assert_eq!(animal.id, Some(AnimalId::Text("448548202500123".to_string())));

        let animal = normalizer().normalize(&json!({"id": "  ", "seq": 3}));
        assert_eq!(animal.id, Some(AnimalId::Number(3)));
    }

    #[test]
    fn test_open_data_record() {
        let animal = normalizer().normalize(&json!({
            "desertionNo": "411300202500456",
            "kindCd": "[개] 말티즈",
            "age": "2020(년생)",
            "sexCd": "F",
            "neuterYn": "Y",
            "processState": "보호중",
            "careNm": "부산동물보호센터",
            "careAddr": "부산광역시 강서구 군라2길 206",
            "careTel": "051-000-0000",
            "popfile": "https://openapi.animal.go.kr/files/a.jpg",
            "specialMark": "온순함",
            "weight": "3(Kg)"
        }));
        assert_eq!(animal.breed.as_deref(), Some("말티즈"));
        assert_eq!(animal.sex, SexLabel::Female);
        assert_eq!(animal.neuter, NeuterFlag::Yes);
        assert_eq!(animal.process_state.as_deref(), Some("보호중"));
        assert_eq!(animal.shelter_address, "부산광역시 강서구 군라2길 206");
        assert_eq!(
            animal.photo_url.as_deref(),
            Some("https://openapi.animal.go.kr/files/a.jpg")
        );
        assert_eq!(animal.weight.as_deref(), Some("3(Kg)"));
    }

    #[test]
    fn test_relative_photo_is_resolved() {
        let animal = normalizer().normalize(&json!({"photoUrl": "/uploads/p1.jpg"}));
        assert_eq!(
            animal.photo_url.as_deref(),
            Some("http://localhost:8080/api/uploads/p1.jpg")
        );

        let animal = normalizer().normalize(&json!({"popfile": ""}));
        assert_eq!(animal.photo_url, None);
    }

    #[test]
    fn test_neuter_variants() {
        let n = normalizer();
        assert_eq!(n.normalize(&json!({"neutered": true})).neuter, NeuterFlag::Yes);
        assert_eq!(n.normalize(&json!({"neuter": "n"})).neuter, NeuterFlag::No);
        assert_eq!(n.normalize(&json!({"neuterYn": "U"})).neuter, NeuterFlag::Unspecified(None));
        assert_eq!(
            n.normalize(&json!({"neuter": "수술 예정"})).neuter,
            NeuterFlag::Unspecified(Some("수술 예정".to_string()))
        );
    }

    #[test]
    fn test_breed_sanitizing() {
        assert_eq!(sanitize_breed("000114"), None);
        assert_eq!(sanitize_breed("[고양이] 코리안숏헤어").as_deref(), Some("코리안숏헤어"));
        assert_eq!(sanitize_breed("진돗개 믹스").as_deref(), Some("진돗개 믹스"));
        assert_eq!(sanitize_breed("[개]"), None);
    }

    #[test]
    fn test_reason_chips() {
        let chips = parse_reason_chips("같은 구 +20, 중성화(+6) | 위험: -60 ; 산책 좋아함,,");
        assert_eq!(
            chips,
            vec![
                ReasonChip { label: "같은 구".into(), delta: Some(20.0) },
                ReasonChip { label: "중성화".into(), delta: Some(6.0) },
                ReasonChip { label: "위험".into(), delta: Some(-60.0) },
                ReasonChip { label: "산책 좋아함".into(), delta: None },
            ]
        );
    }

    #[test]
    fn test_reason_chips_degrade_gracefully() {
        assert!(parse_reason_chips("").is_empty());
        assert_eq!(
            parse_reason_chips("+5"),
            vec![ReasonChip { label: "+5".into(), delta: None }]
        );
        assert_eq!(
            parse_reason_chips("((( ???"),
            vec![ReasonChip { label: "((( ???".into(), delta: None }]
        );
    }

    #[test]
    fn test_precomputed_recommendation_fields() {
        let animal = normalizer().normalize(&json!({
            "id": 12,
            "score": "0.83",
            "reasons": ["근거리 +20", "초보 적합"]
        }));
        assert_eq!(animal.upstream_score, Some(0.83));
        assert_eq!(animal.reason.len(), 2);
        assert_eq!(animal.reason[0].delta, Some(20.0));
    }
}
