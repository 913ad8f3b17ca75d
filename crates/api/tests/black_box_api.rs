use std::sync::Arc;

use marketstat_api::app::{build_app, services::AppServices};
use marketstat_infra::{
    cache::InMemoryResponseCache,
    db::SqliteStore,
    mail::RecordingMailer,
};
use marketstat_reporting::SystemClock;
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    mailer: RecordingMailer,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory backends, ephemeral port.
        let mailer = RecordingMailer::new();
        let store = SqliteStore::in_memory()
            .await
            .expect("failed to open in-memory store");
        let services = AppServices::new(
            Arc::new(store),
            Arc::new(InMemoryResponseCache::new()),
            Arc::new(mailer.clone()),
            Arc::new(SystemClock),
            "test-cache",
        );
        let app = build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            mailer,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create(
    client: &reqwest::Client,
    srv: &TestServer,
    path: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let res = client.post(srv.url(path)).json(&body).send().await.unwrap();
    if res.status() != StatusCode::CREATED {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        panic!("expected 201 Created from {path}, got {status} body={body}");
    }
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn seller_create_then_fetch() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create(
        &client,
        &srv,
        "/sellers/",
        json!({ "name": "Acme", "email": "acme@shop.com" }),
    )
    .await;
    assert_eq!(created["name"], "Acme");
    let id = created["id"].as_i64().unwrap();

    let res = client.get(srv.url(&format!("/sellers/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched, created);

    let res = client.get(srv.url("/sellers")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(list, vec![created]);
}

#[tokio::test]
async fn seller_validation_and_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/sellers/"))
        .json(&json!({ "name": "Acme", "email": "not-an-email" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    create(&client, &srv, "/sellers/", json!({ "name": "Acme", "email": "a@x.com" })).await;
    let res = client
        .post(srv.url("/sellers/"))
        .json(&json!({ "name": "Other", "email": "a@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/sellers/999")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Seller not found");

    let res = client.get(srv.url("/products/999")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product not found");

    let res = client.get(srv.url("/sales/abc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn product_and_sale_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let seller = create(&client, &srv, "/sellers/", json!({ "name": "Acme", "email": "a@x.com" })).await;
    let product = create(
        &client,
        &srv,
        "/products/",
        json!({ "name": "Widget", "price": 9.5, "seller_id": seller["id"] }),
    )
    .await;
    assert_eq!(product["price"], 9.5);
    assert_eq!(product["seller_id"], seller["id"]);

    let dated = create(
        &client,
        &srv,
        "/sales/",
        json!({ "product_id": product["id"], "quantity": 2, "sale_date": "2024-01-15T10:00:00Z" }),
    )
    .await;
    assert_eq!(dated["sale_date"], "2024-01-15T10:00:00Z");

    let undated = create(
        &client,
        &srv,
        "/sales",
        json!({ "product_id": product["id"], "quantity": 1 }),
    )
    .await;
    assert!(undated["sale_date"].is_string());

    let res = client
        .post(srv.url("/sales/"))
        .json(&json!({ "product_id": product["id"], "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(srv.url("/sales/?skip=1&limit=10")).send().await.unwrap();
    let page: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"], undated["id"]);
}

#[tokio::test]
async fn list_responses_are_cached() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let first = client.get(srv.url("/sellers/")).send().await.unwrap();
    assert_eq!(first.headers()["x-marketstat-cache"], "Miss");
    let first: Vec<serde_json::Value> = first.json().await.unwrap();
    assert!(first.is_empty());

    // A write does not invalidate; the cached page is served until it expires.
    create(&client, &srv, "/sellers/", json!({ "name": "Acme", "email": "a@x.com" })).await;

    let second = client.get(srv.url("/sellers/")).send().await.unwrap();
    assert_eq!(second.headers()["x-marketstat-cache"], "Hit");
    let second: Vec<serde_json::Value> = second.json().await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn statistics_request_is_accepted_and_mailed_once() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let seller = create(&client, &srv, "/sellers/", json!({ "name": "Acme", "email": "a@x.com" })).await;
    let product = create(
        &client,
        &srv,
        "/products/",
        json!({ "name": "Widget", "price": 1.0, "seller_id": seller["id"] }),
    )
    .await;
    create(&client, &srv, "/sales/", json!({ "product_id": product["id"], "quantity": 3 })).await;

    let res = client
        .post(srv.url("/statistics/"))
        .json(&json!({ "email": "x@y.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("accepted"));

    // Delivery happens out-of-band; poll briefly.
    let mut sent = Vec::new();
    for _ in 0..100 {
        sent = srv.mailer.sent_to("x@y.com");
        if !sent.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(sent.len(), 1, "expected exactly one report email");
    assert_eq!(sent[0].subject, "Seller statistics");
    assert!(sent[0].body.contains("Seller: Acme (ID: 1)"));
    assert!(sent[0].body.contains("- Products: 1"));
    assert!(sent[0].body.contains("- Total sales: 1"));
    assert!(sent[0].body.contains("- Shipments this month: 1"));

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(srv.mailer.sent().len(), 1);
}

#[tokio::test]
async fn statistics_rejects_invalid_email() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/statistics"))
        .json(&json!({ "email": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(srv.mailer.sent().is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (path, body) in [
        ("/sellers/", json!({ "name": "Acme" })),
        ("/products/", json!({ "name": "Widget", "price": "cheap", "seller_id": 1 })),
        ("/sales/", json!({ "quantity": 1 })),
        ("/statistics/", json!({})),
    ] {
        let res = client.post(srv.url(path)).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "POST {path} {body}");
        let err: serde_json::Value = res.json().await.unwrap();
        assert_eq!(err["error"], "validation_error", "POST {path} {body}");
        assert!(err["message"].is_string());
    }
    assert!(srv.mailer.sent().is_empty());
}

#[tokio::test]
async fn naive_sale_date_is_read_as_utc() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let seller = create(&client, &srv, "/sellers/", json!({ "name": "Acme", "email": "a@x.com" })).await;
    let product = create(
        &client,
        &srv,
        "/products/",
        json!({ "name": "Widget", "price": 1.0, "seller_id": seller["id"] }),
    )
    .await;

    let sale = create(
        &client,
        &srv,
        "/sales/",
        json!({ "product_id": product["id"], "quantity": 1, "sale_date": "2024-01-15T10:00:00" }),
    )
    .await;
    assert_eq!(sale["sale_date"], "2024-01-15T10:00:00Z");

    let res = client
        .post(srv.url("/sales/"))
        .json(&json!({ "product_id": product["id"], "quantity": 1, "sale_date": "yesterday" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
