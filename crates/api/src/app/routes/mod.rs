use axum::Router;

pub mod common;
pub mod products;
pub mod sales;
pub mod sellers;
pub mod statistics;
pub mod system;

/// Router for all resource endpoints.
pub fn router() -> Router {
    Router::new()
        .merge(sellers::router())
        .merge(products::router())
        .merge(sales::router())
        .merge(statistics::router())
}
