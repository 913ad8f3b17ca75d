use core::str::FromStr;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use marketstat_core::{DomainError, Entity};

use crate::app::errors;

/// Parse a path id, mapping failures to a `400 invalid_id` response.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(errors::domain_error_to_response)
}

/// Unwrap a JSON body, turning malformed or incomplete input into a
/// `400 validation_error` instead of axum's plain-text rejection.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            rejection.body_text(),
        )),
    }
}

/// `201 Created` with the stored entity.
pub fn created<E>(entity: E) -> Response
where
    E: Entity + Serialize,
{
    tracing::info!(kind = E::KIND, id = ?entity.id(), "record created");
    (StatusCode::CREATED, Json(entity)).into_response()
}
