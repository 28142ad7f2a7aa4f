//! Routes for the Illustration context.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use storyboard_illustration::application::command_handlers;
use storyboard_illustration::domain::commands;
use storyboard_illustration::domain::plan::GenerationRequest;

use crate::error::ApiError;
use crate::state::AppState;

/// Image options nested in the generate request.
#[derive(Debug, Default, Deserialize)]
pub struct ImageOptions {
    /// Requested size, e.g. `1024x1536`.
    #[serde(default)]
    pub size: Option<String>,
}

/// Request body for POST /generate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Block text with background and `[PROMPT n]` sections.
    pub block: String,
    /// Image options.
    #[serde(default)]
    pub image: Option<ImageOptions>,
    /// Chain the previous panel's prompt and image.
    #[serde(default)]
    pub use_image_references: bool,
    /// 1-based position of the panel to render.
    pub panel_index: i64,
    /// Base64 of the previously rendered panel.
    #[serde(default)]
    pub previous_image: Option<String>,
}

/// Response body for POST /generate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Suggested download filename.
    pub filename: String,
    /// Base64-encoded PNG.
    pub image_base64: String,
    /// Number of the rendered panel as declared in the block.
    pub panel_index: i64,
    /// 1-based position that was rendered.
    pub panel_position: usize,
    /// Panels available after truncation.
    pub total_panels: usize,
    /// Image size used.
    pub size: String,
}

/// POST /generate
#[instrument(
    skip(state, request),
    fields(panel_index = request.panel_index, chained = request.use_image_references)
)]
async fn generate_panel(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let command = commands::GeneratePanel {
        correlation_id: Uuid::new_v4(),
        block: request.block,
        request: GenerationRequest {
            panel_index: request.panel_index,
            size: request.image.and_then(|image| image.size),
            use_image_references: request.use_image_references,
            previous_image: request.previous_image,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling generate_panel command");

    let generated =
        command_handlers::handle_generate_panel(&command, state.images.as_ref()).await?;

    Ok(Json(GenerateResponse {
        filename: generated.filename,
        image_base64: STANDARD.encode(&generated.image),
        panel_index: generated.panel_number,
        panel_position: generated.position,
        total_panels: generated.total_panels,
        size: generated.size,
    }))
}

/// Returns the router for the illustration context.
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generate_panel))
}
