use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use marketstat_core::{DomainError, Entity, SaleId};
use marketstat_sales::{NewSale, Sale};

use crate::app::dto::ListParams;
use crate::app::errors;
use crate::app::routes::common::{created, json_body, parse_id};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/sales", post(create_sale).get(list_sales))
        .route("/sales/", post(create_sale).get(list_sales))
        .route("/sales/:id", get(get_sale))
}

pub async fn create_sale(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<NewSale>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    match services.store.create_sale(&body).await {
        Ok(sale) => created(sale),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ListParams>,
) -> axum::response::Response {
    match services.store.list_sales(params.into()).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SaleId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store.get_sale(id).await {
        Ok(Some(sale)) => (StatusCode::OK, Json(sale)).into_response(),
        Ok(None) => errors::domain_error_to_response(DomainError::not_found(Sale::KIND)),
        Err(e) => errors::store_error_to_response(e),
    }
}
