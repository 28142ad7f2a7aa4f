//! Integration tests for panel rendering.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use storyboard_providers::fixture::FIXTURE_PNG;
use storyboard_test_support::{
    FailingImageProvider, RecordingImageProvider, ScriptedCompletionProvider,
};

const BLOCK: &str = "[BASIC BACKGROUND / CONTEXT]\n\
                     Soft pastel palette.\n\n\
                     [PROMPT 1] Arrival\n\
                     A train pulls into a snowy station.\n\n\
                     [PROMPT 2] Platform\n\
                     A girl steps onto the platform.\n\n\
                     [PROMPT 3] Goodbye\n\
                     The train leaves.";

fn recording_app() -> (axum::Router, Arc<RecordingImageProvider>) {
    let images = Arc::new(RecordingImageProvider::default());
    let app = common::build_test_app_with(
        Arc::new(ScriptedCompletionProvider::new("{}")),
        images.clone(),
    );
    (app, images)
}

#[tokio::test]
async fn test_generate_with_fixture_provider_returns_png() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, json) = common::post_json(
        app,
        "/api/generate",
        &json!({ "block": BLOCK, "panelIndex": 3 }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["filename"], "03-goodbye.png");
    assert_eq!(json["panelPosition"], 3);
    assert_eq!(json["totalPanels"], 3);
    let image = STANDARD
        .decode(json["imageBase64"].as_str().unwrap())
        .unwrap();
    assert_eq!(image, FIXTURE_PNG);
}

#[tokio::test]
async fn test_generate_chained_panel_carries_previous_prompt_and_image() {
    // Arrange
    let (app, images) = recording_app();
    let previous = STANDARD.encode(b"panel-one-png");

    // Act
    let (status, _json) = common::post_json(
        app,
        "/api/generate",
        &json!({
            "block": BLOCK,
            "useImageReferences": true,
            "panelIndex": 2,
            "previousImage": previous,
        }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let calls = images.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].prompt,
        "Soft pastel palette.\n\n\
         A girl steps onto the platform.\n\n\
         Consistency note based on previous panel: A train pulls into a snowy station."
    );
    assert_eq!(calls[0].reference.as_deref(), Some(&b"panel-one-png"[..]));
    assert_eq!(calls[0].size, "1024x1536");
}

#[tokio::test]
async fn test_generate_chaining_without_image_falls_back_to_generate() {
    let (app, images) = recording_app();

    let (status, _json) = common::post_json(
        app,
        "/api/generate",
        &json!({ "block": BLOCK, "useImageReferences": true, "panelIndex": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let calls = images.calls();
    assert!(calls[0].reference.is_none());
    assert!(calls[0].prompt.contains("Consistency note based on previous panel"));
}

#[tokio::test]
async fn test_generate_index_addresses_sorted_position() {
    // Arrange
    let (app, images) = recording_app();
    let block = "[PROMPT 7] Late\nSeventh.\n[PROMPT 3] Early\nThird.";

    // Act
    let (status, json) = common::post_json(
        app,
        "/api/generate",
        &json!({ "block": block, "panelIndex": 1 }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["panelIndex"], 3);
    assert_eq!(json["panelPosition"], 1);
    assert_eq!(json["filename"], "03-early.png");
    assert_eq!(images.calls()[0].prompt, "Third.");
}

#[tokio::test]
async fn test_generate_rejects_out_of_range_index() {
    let (app, images) = recording_app();

    let (status, json) = common::post_json(
        app,
        "/api/generate",
        &json!({ "block": BLOCK, "panelIndex": 4 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "panel_index_out_of_range");
    assert!(images.calls().is_empty());
}

#[tokio::test]
async fn test_generate_rejects_block_without_panels() {
    let (app, _images) = recording_app();

    let (status, json) = common::post_json(
        app,
        "/api/generate",
        &json!({ "block": "Just some background.", "panelIndex": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "no_panels_found");
}

#[tokio::test]
async fn test_generate_reports_missing_image_as_502() {
    let app = common::build_test_app_with(
        Arc::new(ScriptedCompletionProvider::new("{}")),
        Arc::new(FailingImageProvider),
    );

    let (status, json) = common::post_json(
        app,
        "/api/generate",
        &json!({ "block": BLOCK, "panelIndex": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "invalid_upstream_output");
}

#[tokio::test]
async fn test_generate_rejects_oversized_body() {
    let app = common::build_test_app();
    let body = json!({
        "block": BLOCK,
        "panelIndex": 1,
        "previousImage": "A".repeat(common::TEST_BODY_LIMIT),
    });

    let request = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
