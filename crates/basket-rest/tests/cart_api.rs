//! Cart API endpoint tests.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use basket_config::ServerConfig;
use basket_core::{BasketError, BasketResult};
use basket_jobs::MemoryJobScheduler;
use basket_rest::{create_router, AppState};
use basket_service::{
    CacheInterface, CartCoordinator, MemoryCacheService, NonEmptyCartPolicy, ReminderSettings,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Store whose backend is always unreachable.
struct DownStore;

#[async_trait]
impl CacheInterface for DownStore {
    async fn get_raw(&self, _key: &str) -> BasketResult<Option<String>> {
        Err(BasketError::store_unavailable("connection refused"))
    }

    async fn set_raw(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> BasketResult<()> {
        Err(BasketError::store_unavailable("connection refused"))
    }

    async fn compare_and_swap_raw(&self, _key: &str, _expected: &str, _value: &str) -> BasketResult<bool> {
        Err(BasketError::store_unavailable("connection refused"))
    }

    async fn delete(&self, _key: &str) -> BasketResult<bool> {
        Err(BasketError::store_unavailable("connection refused"))
    }

    async fn health_check(&self) -> BasketResult<()> {
        Err(BasketError::store_unavailable("connection refused"))
    }
}

fn app_with_store(store: Arc<dyn CacheInterface>) -> Router {
    let coordinator = CartCoordinator::new(
        store,
        Arc::new(MemoryJobScheduler::new()),
        Arc::new(NonEmptyCartPolicy),
        ReminderSettings::default(),
    );
    create_router(AppState::new(Arc::new(coordinator)), &ServerConfig::default())
}

fn app() -> Router {
    app_with_store(Arc::new(MemoryCacheService::new()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn put_cart(body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/cart")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn alice_cart() -> Value {
    json!({
        "username": "alice",
        "emailAddress": "alice@example.com",
        "items": [
            { "productId": "p-1", "productName": "Mug", "quantity": 2, "price": "10.00" },
            { "productId": "p-2", "quantity": 1, "price": 5.5 }
        ]
    })
}

#[tokio::test]
async fn test_put_then_get_cart() {
    let app = app();

    let (status, body) = send(&app, put_cart(alice_cart())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["totalPrice"], "25.50");
    assert!(body["deferredActionId"].is_string());

    let (status, body) = send(&app, get("/cart/alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emailAddress"], "alice@example.com");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["productName"], "Mug");
}

#[tokio::test]
async fn test_get_missing_cart_is_404() {
    let (status, body) = send(&app(), get("/cart/nobody")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_cart() {
    let app = app();
    send(&app, put_cart(alice_cart())).await;

    let (status, body) = send(&app, delete("/cart/alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);

    let (status, _) = send(&app, get("/cart/alice")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, delete("/cart/alice")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_cart_is_400() {
    let cart = json!({
        "username": "alice",
        "items": [{ "productId": "p-1", "quantity": 0, "price": "1.00" }]
    });

    let (status, body) = send(&app(), put_cart(cart)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_store_down_is_503() {
    let app = app_with_store(Arc::new(DownStore));

    let (status, body) = send(&app, get("/cart/alice")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");

    let (status, _) = send(&app, put_cart(alice_cart())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(&app, delete("/cart/alice")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_endpoints() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = send(&app(), get("/live")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app(), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app_with_store(Arc::new(DownStore)), get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let response = app().oneshot(get("/live")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let request = Request::builder()
        .method("PUT")
        .uri("/cart")
        .header("content-type", "application/json")
        .body(Body::from("{\"username\": \"alice\", \"items\": [{"))
        .unwrap();

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app(), put_cart(json!({ "username": "alice", "items": "none" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_error_body_carries_request_id() {
    let response = app().oneshot(get("/cart/nobody")).await.unwrap();
    let request_id = response.headers()["x-request-id"].to_str().unwrap().to_string();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["trace_id"], request_id);
}
