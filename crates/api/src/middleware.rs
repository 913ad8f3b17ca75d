use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use marketstat_infra::cache::{CachedResponse, ResponseCache};

pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-marketstat-cache");

/// Upper bound on a response body we are willing to buffer for caching.
const MAX_CACHED_BODY: usize = 4 * 1024 * 1024;

#[derive(Clone)]
pub struct CacheState {
    pub cache: Arc<dyn ResponseCache>,
    pub prefix: String,
    pub ttl: Duration,
}

impl CacheState {
    fn key_for(&self, req: &Request<Body>) -> String {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| req.uri().path());
        format!("{}:{}:{}", self.prefix, req.method(), target)
    }
}

/// Serve GET requests from the response cache, filling it on `200 OK`.
///
/// Cache backend failures never fail the request: they are logged and the
/// handler runs as if the cache were empty.
pub async fn cache_middleware(
    State(state): State<CacheState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() != Method::GET {
        return next.run(req).await;
    }

    let key = state.key_for(&req);

    match state.cache.get(&key).await {
        Ok(Some(hit)) => return replay(hit),
        Ok(None) => {}
        Err(e) => tracing::warn!(cache_key = %key, error = %e, "response cache read failed"),
    }

    let response = next.run(req).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_CACHED_BODY).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(cache_key = %key, error = %e, "response body could not be buffered");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let entry = CachedResponse {
        status: parts.status.as_u16(),
        content_type: parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: bytes.to_vec(),
    };
    if let Err(e) = state.cache.put(&key, &entry, state.ttl).await {
        tracing::warn!(cache_key = %key, error = %e, "response cache write failed");
    }

    parts
        .headers
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static("Miss"));
    Response::from_parts(parts, Body::from(bytes))
}

fn replay(hit: CachedResponse) -> Response {
    let mut response = Response::new(Body::from(hit.body));
    *response.status_mut() = StatusCode::from_u16(hit.status).unwrap_or(StatusCode::OK);

    let headers = response.headers_mut();
    if let Some(ct) = hit.content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
        headers.insert(header::CONTENT_TYPE, ct);
    }
    headers.insert(CACHE_STATUS_HEADER, HeaderValue::from_static("Hit"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{routing::get, Router};
    use tower::ServiceExt;

    use marketstat_infra::cache::InMemoryResponseCache;

    fn app(hits: Arc<AtomicUsize>) -> Router {
        let state = CacheState {
            cache: Arc::new(InMemoryResponseCache::new()),
            prefix: "test".to_string(),
            ttl: Duration::from_secs(30),
        };
        let counted = hits.clone();
        Router::new()
            .route(
                "/things",
                get(move || {
                    let n = counted.fetch_add(1, Ordering::SeqCst) + 1;
                    async move { format!("call {n}") }
                })
                .post(|| async { StatusCode::CREATED }),
            )
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .layer(axum::middleware::from_fn_with_state(state, cache_middleware))
    }

    async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
        let req = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let cache = res
            .headers()
            .get(CACHE_STATUS_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, cache, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn second_get_is_served_from_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app(hits.clone());

        let first = call(&app, Method::GET, "/things").await;
        let second = call(&app, Method::GET, "/things").await;

        assert_eq!(first, (StatusCode::OK, Some("Miss".into()), "call 1".into()));
        assert_eq!(second, (StatusCode::OK, Some("Hit".into()), "call 1".into()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn query_string_is_part_of_the_key() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app(hits.clone());

        call(&app, Method::GET, "/things?skip=0").await;
        let other = call(&app, Method::GET, "/things?skip=1").await;

        assert_eq!(other.1.as_deref(), Some("Miss"));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_get_and_non_ok_bypass_cache() {
        let app = app(Arc::new(AtomicUsize::new(0)));

        let post = call(&app, Method::POST, "/things").await;
        assert_eq!((post.0, post.1), (StatusCode::CREATED, None));

        for _ in 0..2 {
            let missing = call(&app, Method::GET, "/missing").await;
            assert_eq!((missing.0, missing.1), (StatusCode::NOT_FOUND, None));
        }
    }
}
