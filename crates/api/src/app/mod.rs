//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (store, cache, mailer, dispatcher)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// How long cached GET responses stay valid.
pub const RESPONSE_CACHE_TTL: Duration = Duration::from_secs(30);

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: services::AppServices) -> Router {
    let cache_state = middleware::CacheState {
        cache: services.cache.clone(),
        prefix: services.cache_prefix.clone(),
        ttl: RESPONSE_CACHE_TTL,
    };
    let services = Arc::new(services);

    let resources = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            cache_state,
            middleware::cache_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(resources)
        .layer(ServiceBuilder::new())
}
