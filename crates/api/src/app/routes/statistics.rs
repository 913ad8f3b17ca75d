use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use marketstat_core::validate_email;

use crate::app::dto::{MessageResponse, StatisticsRequest, REPORT_ACCEPTED_MESSAGE};
use crate::app::errors;
use crate::app::routes::common::json_body;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/statistics", post(request_statistics))
        .route("/statistics/", post(request_statistics))
}

/// Accept a report request and return before any report work starts.
pub async fn request_statistics(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<StatisticsRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(e) = validate_email(&body.email) {
        return errors::domain_error_to_response(e);
    }

    services.dispatcher.request_report(body.email);

    (
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: REPORT_ACCEPTED_MESSAGE.to_string(),
        }),
    )
        .into_response()
}
