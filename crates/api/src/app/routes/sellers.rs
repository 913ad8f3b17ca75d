use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use marketstat_core::{DomainError, Entity, SellerId};
use marketstat_sellers::{NewSeller, Seller};

use crate::app::dto::ListParams;
use crate::app::errors;
use crate::app::routes::common::{created, json_body, parse_id};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/sellers", post(create_seller).get(list_sellers))
        .route("/sellers/", post(create_seller).get(list_sellers))
        .route("/sellers/:id", get(get_seller))
}

pub async fn create_seller(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<NewSeller>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    match services.store.create_seller(&body).await {
        Ok(seller) => created(seller),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_sellers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ListParams>,
) -> axum::response::Response {
    match services.store.list_sellers(params.into()).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_seller(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SellerId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store.get_seller(id).await {
        Ok(Some(seller)) => (StatusCode::OK, Json(seller)).into_response(),
        Ok(None) => errors::domain_error_to_response(DomainError::not_found(Seller::KIND)),
        Err(e) => errors::store_error_to_response(e),
    }
}
