//! Deterministic providers for local development and demos.
//!
//! Selected with `STORYBOARD_PROVIDER=fixture`. They never touch the
//! network and always answer the same way for the same input.

use async_trait::async_trait;
use serde_json::json;
use storyboard_core::error::DomainError;
use storyboard_core::panel::PANEL_COUNT;
use storyboard_core::provider::{CompletionProvider, ImageProvider};
use tracing::debug;

/// A 1x1 transparent PNG.
pub const FIXTURE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

const FIXTURE_MODEL: &str = "fixture";

/// Splits a story into trimmed, non-empty sentences.
fn sentences(story: &str) -> Vec<&str> {
    story
        .split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Completion provider that derives eight panels from the story's sentences.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCompletionProvider;

#[async_trait]
impl CompletionProvider for FixtureCompletionProvider {
    fn model(&self) -> &str {
        FIXTURE_MODEL
    }

    async fn complete_json(&self, _system: &str, user: &str) -> Result<String, DomainError> {
        let sentences = sentences(user);
        debug!(sentences = sentences.len(), "building fixture completion");

        let opening = sentences.first().copied().unwrap_or("an untitled story");
        let panels: Vec<_> = (0..PANEL_COUNT)
            .map(|i| {
                let scene = sentences
                    .get(i % sentences.len().max(1))
                    .copied()
                    .unwrap_or("An empty stage");
                json!({
                    "n": i + 1,
                    "title": format!("Scene {}", i + 1),
                    "prompt": format!("{scene}."),
                })
            })
            .collect();

        let payload = json!({
            "background": format!("Flat storybook illustration style. Story opens with: {opening}."),
            "panels": panels,
        });
        Ok(payload.to_string())
    }
}

/// Image provider that always returns [`FIXTURE_PNG`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageProvider;

#[async_trait]
impl ImageProvider for FixtureImageProvider {
    async fn generate(&self, prompt: &str, size: &str) -> Result<Vec<u8>, DomainError> {
        debug!(prompt_length = prompt.len(), size, "fixture image generate");
        Ok(FIXTURE_PNG.to_vec())
    }

    async fn edit(
        &self,
        prompt: &str,
        size: &str,
        reference: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        debug!(
            prompt_length = prompt.len(),
            size,
            reference_bytes = reference.len(),
            "fixture image edit"
        );
        Ok(FIXTURE_PNG.to_vec())
    }
}
