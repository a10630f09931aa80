pub mod reco;

use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(reco::configure),
    );
}

/// Malformed bodies get the same `ErrorResponse` shape as validation failures
pub fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Rejected JSON body on {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: "Invalid JSON".to_string(),
        message: err.to_string(),
        status_code: 400,
    });
    error::InternalError::from_response(err, response).into()
}
