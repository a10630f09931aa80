use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::core::PageParams;
use crate::models::{BatchSource, PartialPage};
use crate::services::store::{read_json, write_json, CacheKey, SnapshotStore};

/// Errors that can occur when fetching candidates upstream
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("All upstream endpoints failed: {0}")]
    Exhausted(String),
}

/// A batch of raw candidate records plus whatever page metadata came with it
#[derive(Debug, Clone)]
pub struct UpstreamBatch {
    pub page: PartialPage<Value>,
    pub source: BatchSource,
}

/// Client for the upstream animal/recommendation API
///
/// Handles:
/// - Trying each configured endpoint in order until one answers
/// - Snapshotting every successful batch
/// - Serving the last snapshot, then a demo batch, when every endpoint fails
///
/// Dropping the future returned by [`UpstreamClient::fetch_candidates`]
/// cancels the in-flight request.
pub struct UpstreamClient<S> {
    base_url: String,
    endpoints: Vec<String>,
    client: Client,
    store: S,
    demo_fallback: bool,
}

impl<S: SnapshotStore> UpstreamClient<S> {
    /// Create a new upstream client
    pub fn new(
        base_url: impl Into<String>,
        endpoints: Vec<String>,
        timeout: Duration,
        store: S,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints,
            client,
            store,
            demo_fallback: true,
        })
    }

    /// Enable or disable the built-in demo batch as last resort
    pub fn with_demo_fallback(mut self, enabled: bool) -> Self {
        self.demo_fallback = enabled;
        self
    }

    /// Fetch one candidate batch for a senior
    pub async fn fetch_candidates(
        &self,
        senior_id: i64,
        params: PageParams,
    ) -> Result<UpstreamBatch, UpstreamError> {
        let key = CacheKey::batch(senior_id, params.page, params.size);
        let mut failures = Vec::with_capacity(self.endpoints.len());

        for path in &self.endpoints {
            match self.fetch_endpoint(path, senior_id, params).await {
                Ok(page) => {
                    tracing::debug!(
                        "Fetched {} records from {} for senior {}",
                        page.content.len(),
                        path,
                        senior_id
                    );
                    if let Err(e) = write_json(&self.store, &key, &page).await {
                        tracing::warn!("Failed to snapshot batch {}: {}", key, e);
                    }
                    return Ok(UpstreamBatch {
                        page,
                        source: BatchSource::Upstream,
                    });
                }
                Err(e) => {
                    tracing::warn!("Upstream endpoint {} failed, trying next: {}", path, e);
                    failures.push(format!("{}: {}", path, e));
                }
            }
        }

        match read_json::<PartialPage<Value>, _>(&self.store, &key).await {
            Ok(Some(page)) => {
                tracing::info!("Serving snapshot {} after upstream failure", key);
                return Ok(UpstreamBatch {
                    page,
                    source: BatchSource::Snapshot,
                });
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Discarding unreadable snapshot {}: {}", key, e),
        }

        if self.demo_fallback {
            tracing::info!("Serving demo batch for senior {} after upstream failure", senior_id);
            return Ok(UpstreamBatch {
                page: PartialPage::from_content(demo_records()),
                source: BatchSource::Demo,
            });
        }

        Err(UpstreamError::Exhausted(failures.join("; ")))
    }

    async fn fetch_endpoint(
        &self,
        path: &str,
        senior_id: i64,
        params: PageParams,
    ) -> Result<PartialPage<Value>, UpstreamError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("seniorId", senior_id.to_string()),
                ("page", params.page.to_string()),
                ("size", params.size.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::ApiError(format!(
                "{} returned {}",
                path,
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        extract_page(json)
    }
}

/// Pull the candidate list and page metadata out of any supported payload
/// shape: a bare array, `{content}`/`{items}` pages, or the open-data
/// `{response: {body: {items: {item}}}}` envelope.
pub fn extract_page(json: Value) -> Result<PartialPage<Value>, UpstreamError> {
    if let Value::Array(items) = json {
        return Ok(PartialPage::from_content(items));
    }
    if json.get("response").is_some() {
        return extract_open_data(&json);
    }

    let content = ["content", "items"]
        .iter()
        .find_map(|field| match json.get(*field) {
            Some(Value::Array(items)) => Some(items.clone()),
            _ => None,
        })
        .ok_or_else(|| UpstreamError::InvalidResponse("Missing candidate list".into()))?;

    // Unreadable metadata is left for reconcile to backfill
    let mut page = PartialPage::from_content(content);
    page.number = first_u64(&json, &["number"]).and_then(|n| u32::try_from(n).ok());
    page.size = first_u64(&json, &["size"]).and_then(|n| u32::try_from(n).ok());
    page.total_elements = first_u64(&json, &["totalElements", "total"]);
    page.total_pages = first_u64(&json, &["totalPages"]).and_then(|n| u32::try_from(n).ok());
    page.first = json.get("first").and_then(Value::as_bool);
    page.last = json.get("last").and_then(Value::as_bool);
    page.empty = json.get("empty").and_then(Value::as_bool);
    Ok(page)
}

fn extract_open_data(json: &Value) -> Result<PartialPage<Value>, UpstreamError> {
    let body = json
        .pointer("/response/body")
        .ok_or_else(|| UpstreamError::InvalidResponse("Missing response body".into()))?;

    // A single result comes back as an object instead of a one-element array
    let content = match body.pointer("/items/item") {
        Some(Value::Array(items)) => items.clone(),
        Some(item @ Value::Object(_)) => vec![item.clone()],
        _ => Vec::new(),
    };

    let mut page = PartialPage::from_content(content);
    page.total_elements = first_u64(body, &["totalCount"]);
    // pageNo is one-based
    page.number = first_u64(body, &["pageNo"])
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| u32::try_from(n).ok());
    page.size = first_u64(body, &["numOfRows"]).and_then(|n| u32::try_from(n).ok());
    Ok(page)
}

/// First of `fields` holding a non-negative integer, as a number or a
/// numeric string
fn first_u64(json: &Value, fields: &[&str]) -> Option<u64> {
    fields.iter().find_map(|field| match json.get(*field)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Demo batch served when neither upstream nor a snapshot is available
pub fn demo_records() -> Vec<Value> {
    vec![
        json!({
            "id": "demo-1",
            "kindCd": "[개] 말티즈",
            "age": "2020(년생)",
            "sexCd": "F",
            "neuterYn": "Y",
            "processState": "보호중",
            "careNm": "부산동물보호센터",
            "careAddr": "부산광역시 강서구 군라2길 206",
            "specialMark": "소형, 사람 좋아함"
        }),
        json!({
            "id": "demo-2",
            "kindCd": "[개] 진돗개 믹스",
            "age": "2021(년생)",
            "sexCd": "M",
            "neuterYn": "Y",
            "processState": "보호중",
            "careNm": "해운대 보호소",
            "careAddr": "부산광역시 해운대구 송정동",
            "specialMark": "산책 많이 필요, 활발"
        }),
        json!({
            "id": "demo-3",
            "kindCd": "[고양이] 코리안숏헤어",
            "age": "2016(년생)",
            "sexCd": "F",
            "neuterYn": "N",
            "processState": "보호중",
            "careNm": "사하구 동물병원",
            "careAddr": "부산광역시 사하구 하단동",
            "specialMark": "온순, 조용함"
        }),
    ]
}
