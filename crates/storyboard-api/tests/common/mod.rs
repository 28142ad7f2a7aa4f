//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use storyboard_core::provider::{CompletionProvider, ImageProvider};
use storyboard_providers::{FixtureCompletionProvider, FixtureImageProvider};
use tower::ServiceExt;

use storyboard_api::build_router;
use storyboard_api::state::AppState;

/// Body limit used by the test router.
pub const TEST_BODY_LIMIT: usize = 64 * 1024;

/// Build the full app router backed by the offline fixture providers.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with(
        Arc::new(FixtureCompletionProvider),
        Arc::new(FixtureImageProvider),
    )
}

/// Build the full app router with caller-supplied providers.
pub fn build_test_app_with(
    completion: Arc<dyn CompletionProvider>,
    images: Arc<dyn ImageProvider>,
) -> Router {
    build_router(AppState::new(completion, images), TEST_BODY_LIMIT)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
