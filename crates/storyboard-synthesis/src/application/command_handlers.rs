//! Command handlers for the Prompt Synthesis context.
//!
//! Handlers validate the command, call the completion provider and hand the
//! raw content to the normalizer.

use std::time::Instant;

use storyboard_core::command::Command;
use storyboard_core::error::DomainError;
use storyboard_core::panel::PanelSet;
use storyboard_core::provider::CompletionProvider;
use tracing::{info, instrument};

use crate::domain::commands::SynthesizePrompts;
use crate::domain::instructions::SYSTEM_INSTRUCTION;
use crate::domain::normalizer;

/// Result of a successfully handled synthesis command.
#[derive(Debug)]
pub struct SynthesisResult {
    /// Normalized background and eight panels.
    pub panel_set: PanelSet,
    /// Model that produced the completion.
    pub model: String,
}

/// Handles the `SynthesizePrompts` command: asks the completion provider for
/// a background and eight panels, then normalizes the answer.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the story is blank, any error the
/// provider reports, or `DomainError::InvalidUpstreamOutput` if the content
/// cannot be decoded.
#[instrument(
    skip(command, provider),
    fields(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id,
    )
)]
pub async fn handle_synthesize_prompts(
    command: &SynthesizePrompts,
    provider: &dyn CompletionProvider,
) -> Result<SynthesisResult, DomainError> {
    let story = command.story.trim();
    if story.is_empty() {
        return Err(DomainError::Validation("story must not be empty".into()));
    }

    info!(
        story_length = story.len(),
        model = provider.model(),
        "requesting panel prompts"
    );
    let started = Instant::now();

    let content = provider.complete_json(SYSTEM_INSTRUCTION, story).await?;

    info!(
        duration_ms = started.elapsed().as_millis(),
        content_length = content.len(),
        "completion received"
    );

    let panel_set = normalizer::decode_completion(&content)?;

    Ok(SynthesisResult {
        panel_set,
        model: provider.model().to_owned(),
    })
}
