//! Routes for the Prompt Synthesis context.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use storyboard_core::panel::Panel;
use storyboard_synthesis::application::command_handlers;
use storyboard_synthesis::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /prompts.
#[derive(Debug, Deserialize)]
pub struct PromptsRequest {
    /// Free-text story.
    pub story: String,
}

/// Response body for POST /prompts.
#[derive(Debug, Serialize)]
pub struct PromptsResponse {
    /// Shared background text.
    pub background: String,
    /// Exactly eight panels, in the order the model produced them.
    pub panels: Vec<Panel>,
    /// Model that produced the prompts.
    pub model: String,
    /// The same background and panels rendered as an editable block.
    pub block: String,
}

/// POST /prompts
#[instrument(skip(state, request), fields(story_length = request.story.len()))]
async fn create_prompts(
    State(state): State<AppState>,
    Json(request): Json<PromptsRequest>,
) -> Result<Json<PromptsResponse>, ApiError> {
    let command = commands::SynthesizePrompts {
        correlation_id: Uuid::new_v4(),
        story: request.story,
    };

    info!(correlation_id = %command.correlation_id, "handling synthesize_prompts command");

    let result =
        command_handlers::handle_synthesize_prompts(&command, state.completion.as_ref()).await?;

    let block = result.panel_set.to_block();
    Ok(Json(PromptsResponse {
        background: result.panel_set.background,
        panels: result.panel_set.panels,
        model: result.model,
        block,
    }))
}

/// Returns the router for the synthesis context.
pub fn router() -> Router<AppState> {
    Router::new().route("/prompts", post(create_prompts))
}
