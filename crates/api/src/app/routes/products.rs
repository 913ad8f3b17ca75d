use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use marketstat_core::{DomainError, Entity, ProductId};
use marketstat_products::{NewProduct, Product};

use crate::app::dto::ListParams;
use crate::app::errors;
use crate::app::routes::common::{created, json_body, parse_id};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route("/products/", post(create_product).get(list_products))
        .route("/products/:id", get(get_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    match services.store.create_product(&body).await {
        Ok(product) => created(product),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ListParams>,
) -> axum::response::Response {
    match services.store.list_products(params.into()).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store.get_product(id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(product)).into_response(),
        Ok(None) => errors::domain_error_to_response(DomainError::not_found(Product::KIND)),
        Err(e) => errors::store_error_to_response(e),
    }
}
