use actix_web::{web, HttpResponse, Responder};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use crate::core::{merge_pages, EngineError, PageParams, RankOptions, Recommender};
use crate::models::{
    BatchSource, CandidateView, ErrorResponse, HealthResponse, MergePagesRequest, RankRequest,
    RecommendPetsRequest, RecommendationResponse, ResultPage, ScoredCandidate,
};
use crate::services::{MemoryStore, UpstreamClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub upstream: Arc<UpstreamClient<MemoryStore>>,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/reco/rank", web::post().to(rank_records))
        .route("/reco/pets", web::post().to(recommend_pets))
        .route("/reco/pages/merge", web::post().to(merge));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn bad_request(error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: 400,
    })
}

fn invalid_call(e: EngineError) -> HttpResponse {
    bad_request("Invalid call", e)
}

fn page_params(
    state: &AppState,
    page: Option<i64>,
    size: Option<i64>,
) -> Result<PageParams, EngineError> {
    let mut params = PageParams::from_request(page, size, state.default_page_size)?;
    params.size = params.size.min(state.max_page_size);
    Ok(params)
}

fn respond(page: ResultPage<ScoredCandidate>, source: BatchSource, request_id: String) -> HttpResponse {
    HttpResponse::Ok().json(RecommendationResponse {
        page: page.map(CandidateView::from),
        source,
        request_id,
    })
}

/// Rank an already-fetched batch
///
/// POST /api/v1/reco/rank
///
/// Request body:
/// ```json
/// {
///   "records": [{"desertionNo": "4411", "careAddr": "...", "specialMark": "..."}],
///   "preference": {"address": "...", "prefersLowActivity": true},
///   "page": 0,
///   "size": 12,
///   "availableOnly": false
/// }
/// ```
async fn rank_records(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors);
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let req = req.into_inner();

    let params = match page_params(&state, req.page, req.size) {
        Ok(params) => params,
        Err(e) => return invalid_call(e),
    };
    let options = RankOptions {
        available_only: req.available_only,
    };

    tracing::info!(
        request_id = %request_id,
        "Ranking {} records (page: {}, size: {})",
        req.records.len(),
        params.page,
        params.size
    );

    match state
        .recommender
        .recommend(&req.records, req.preference.as_ref(), params, options)
    {
        Ok(page) => respond(page, BatchSource::Request, request_id),
        Err(e) => invalid_call(e),
    }
}

/// Fetch candidates upstream for a senior, then rank them
///
/// POST /api/v1/reco/pets
///
/// Request body:
/// ```json
/// {
///   "seniorId": 42,
///   "preference": {"address": "...", "prefersSmallSize": true},
///   "page": 0,
///   "size": 12
/// }
/// ```
async fn recommend_pets(
    state: web::Data<AppState>,
    req: web::Json<RecommendPetsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for pets request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors);
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let req = req.into_inner();

    let Some(senior_id) = req.senior_id else {
        return invalid_call(EngineError::MissingIdentifier("seniorId"));
    };
    let Some(mut preference) = req.preference else {
        return invalid_call(EngineError::MissingPreference);
    };
    preference.senior_id.get_or_insert(senior_id);

    let params = match page_params(&state, req.page, req.size) {
        Ok(params) => params,
        Err(e) => return invalid_call(e),
    };
    let options = RankOptions {
        available_only: req.available_only,
    };

    tracing::info!(
        request_id = %request_id,
        "Recommending pets for senior {} (page: {}, size: {})",
        senior_id,
        params.page,
        params.size
    );

    let batch = match state.upstream.fetch_candidates(senior_id, params).await {
        Ok(batch) => batch,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to fetch candidates for senior {}: {}", senior_id, e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch candidates".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let source = batch.source;
    match state
        .recommender
        .recommend_batch(batch.page, Some(&preference), params, options)
    {
        Ok(page) => {
            tracing::info!(
                request_id = %request_id,
                "Returning {} of {} candidates for senior {} ({:?})",
                page.content.len(),
                page.total_elements,
                senior_id,
                source
            );
            respond(page, source, request_id)
        }
        Err(e) => invalid_call(e),
    }
}

/// Append a freshly loaded page to the pages shown so far
///
/// POST /api/v1/reco/pages/merge
async fn merge(req: web::Json<MergePagesRequest>) -> impl Responder {
    let MergePagesRequest { previous, next } = req.into_inner();
    let merged: ResultPage<Value> = merge_pages(previous, next);
    HttpResponse::Ok().json(merged)
}
