use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::domain::SeniorPreference;
use crate::models::responses::ResultPage;

/// Request to rank an already-fetched batch of raw records
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    #[serde(default)]
    pub records: Vec<Value>,
    pub preference: Option<SeniorPreference>,
    #[validate(range(min = 0))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub size: Option<i64>,
    #[serde(default)]
    pub available_only: bool,
}

/// Request to fetch candidates upstream for a senior and rank them
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecommendPetsRequest {
    #[serde(alias = "senior_id")]
    pub senior_id: Option<i64>,
    pub preference: Option<SeniorPreference>,
    #[validate(range(min = 0))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub size: Option<i64>,
    #[serde(default)]
    pub available_only: bool,
}

/// Request to append a freshly loaded page to the pages shown so far
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergePagesRequest {
    #[serde(default)]
    pub previous: Option<ResultPage<Value>>,
    pub next: ResultPage<Value>,
}
