//! Provider abstractions for the upstream model capabilities.
//!
//! In production these are backed by an OpenAI-compatible HTTP API. A
//! deterministic fixture implementation can be selected by configuration,
//! and tests inject their own doubles.

use async_trait::async_trait;

use crate::error::DomainError;

/// Text-completion capability that answers with JSON object content.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Name of the model that serves completions.
    fn model(&self) -> &str;

    /// Sends a system instruction and a user message, requesting JSON object
    /// output, and returns the raw message content.
    async fn complete_json(&self, system: &str, user: &str) -> Result<String, DomainError>;
}

/// Image generation capability.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates an image from a prompt alone.
    async fn generate(&self, prompt: &str, size: &str) -> Result<Vec<u8>, DomainError>;

    /// Generates an image from a prompt, conditioned on a reference image.
    async fn edit(
        &self,
        prompt: &str,
        size: &str,
        reference: &[u8],
    ) -> Result<Vec<u8>, DomainError>;
}
