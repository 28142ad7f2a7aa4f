//! Shared application state.

use std::fmt;
use std::sync::Arc;

use storyboard_core::provider::{CompletionProvider, ImageProvider};
use storyboard_providers::openai::http_client;
use storyboard_providers::{
    FixtureCompletionProvider, FixtureImageProvider, OpenAiCompletionProvider,
    OpenAiImageProvider,
};

use crate::config::{AppConfig, ProviderKind};
use crate::error::AppError;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Completion capability used for prompt synthesis.
    pub completion: Arc<dyn CompletionProvider>,
    /// Image capability used for panel rendering.
    pub images: Arc<dyn ImageProvider>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(completion: Arc<dyn CompletionProvider>, images: Arc<dyn ImageProvider>) -> Self {
        Self { completion, images }
    }

    /// Builds the providers selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        match config.provider {
            ProviderKind::OpenAi => {
                let client = http_client(&config.openai)?;
                Ok(Self::new(
                    Arc::new(OpenAiCompletionProvider::new(client.clone(), &config.openai)),
                    Arc::new(OpenAiImageProvider::new(client, &config.openai)),
                ))
            }
            ProviderKind::Fixture => Ok(Self::new(
                Arc::new(FixtureCompletionProvider),
                Arc::new(FixtureImageProvider),
            )),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("completion_model", &self.completion.model())
            .finish_non_exhaustive()
    }
}
