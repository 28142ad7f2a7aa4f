//! OpenAI-compatible HTTP providers.
//!
//! Completions go to `{base_url}/chat/completions` with JSON object output
//! requested. Images go to `{base_url}/images/generations` (prompt only) or
//! `{base_url}/images/edits` (multipart, with a reference image); the first
//! `b64_json` entry of the response is decoded.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storyboard_core::error::DomainError;
use storyboard_core::provider::{CompletionProvider, ImageProvider};
use tracing::{debug, error, info, instrument};

/// Upper bound on how much of an upstream error body is kept in messages.
const MAX_ERROR_BODY: usize = 512;

/// Connection settings shared by the completion and image providers.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// API key; requests fail with `UpstreamUnavailable` when absent.
    pub api_key: Option<String>,
    /// API base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model used for chat completions.
    pub completion_model: String,
    /// Model used for image generation and edits.
    pub image_model: String,
    /// Ceiling for a single upstream call, long enough for image synthesis.
    pub timeout: Duration,
}

impl OpenAiSettings {
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Builds the HTTP client shared by both providers.
///
/// # Errors
///
/// Returns `DomainError::Internal` if the TLS backend cannot be initialized.
pub fn http_client(settings: &OpenAiSettings) -> Result<Client, DomainError> {
    Client::builder()
        .timeout(settings.timeout)
        .build()
        .map_err(|e| DomainError::Internal(format!("failed to build HTTP client: {e}")))
}

fn require_key(api_key: Option<&str>) -> Result<&str, DomainError> {
    api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| DomainError::UpstreamUnavailable("OPENAI_API_KEY is not set".into()))
}

fn network_error(err: &reqwest::Error) -> DomainError {
    error!(error = %err, "network error reaching upstream API");
    DomainError::UpstreamNetwork(err.to_string())
}

fn truncate(mut text: String) -> String {
    if text.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, DomainError> {
    let status = response.status();
    if !status.is_success() {
        let message = truncate(response.text().await.unwrap_or_default());
        error!(status = %status, error = %message, "upstream API error");
        return Err(DomainError::UpstreamStatus {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.bytes().await.map_err(|e| network_error(&e))?;
    serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "failed to parse upstream response");
        DomainError::InvalidUpstreamOutput(format!("malformed response body: {e}"))
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    n: u8,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

/// Chat-completions backed [`CompletionProvider`].
#[derive(Debug, Clone)]
pub struct OpenAiCompletionProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl OpenAiCompletionProvider {
    /// Creates a completion provider.
    #[must_use]
    pub fn new(client: Client, settings: &OpenAiSettings) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone(),
            model: settings.completion_model.clone(),
            endpoint: settings.endpoint("chat/completions"),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, system, user), fields(model = %self.model))]
    async fn complete_json(&self, system: &str, user: &str) -> Result<String, DomainError> {
        let api_key = require_key(self.api_key.as_deref())?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            n: 1,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        let chat: ChatResponse = read_json(response).await?;

        let usage = chat.usage.unwrap_or_default();
        let choice = chat.choices.into_iter().next().ok_or_else(|| {
            DomainError::InvalidUpstreamOutput("completion returned no choices".into())
        })?;
        info!(
            duration_ms = started.elapsed().as_millis(),
            response_id = chat.id.as_deref().unwrap_or_default(),
            finish_reason = choice.finish_reason.as_deref().unwrap_or_default(),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "completion call finished"
        );

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    b64_json: Option<String>,
}

fn first_image(response: ImagesResponse) -> Result<Vec<u8>, DomainError> {
    let encoded = response
        .data
        .into_iter()
        .next()
        .and_then(|datum| datum.b64_json)
        .ok_or_else(|| {
            DomainError::InvalidUpstreamOutput("image response missing b64_json".into())
        })?;
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| DomainError::InvalidUpstreamOutput(format!("image payload is not base64: {e}")))
}

/// Guesses the MIME type of a reference image from its leading bytes.
fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}

/// Images API backed [`ImageProvider`].
#[derive(Debug, Clone)]
pub struct OpenAiImageProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    generations_endpoint: String,
    edits_endpoint: String,
}

impl OpenAiImageProvider {
    /// Creates an image provider.
    #[must_use]
    pub fn new(client: Client, settings: &OpenAiSettings) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone(),
            model: settings.image_model.clone(),
            generations_endpoint: settings.endpoint("images/generations"),
            edits_endpoint: settings.endpoint("images/edits"),
        }
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, size: &str) -> Result<Vec<u8>, DomainError> {
        let api_key = require_key(self.api_key.as_deref())?;

        let request = ImageGenerationRequest {
            model: &self.model,
            prompt,
            size,
            n: 1,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.generations_endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        let image = first_image(read_json(response).await?)?;

        info!(
            duration_ms = started.elapsed().as_millis(),
            bytes = image.len(),
            "image generation finished"
        );
        Ok(image)
    }

    #[instrument(skip(self, prompt, reference), fields(model = %self.model, reference_bytes = reference.len()))]
    async fn edit(
        &self,
        prompt: &str,
        size: &str,
        reference: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        let api_key = require_key(self.api_key.as_deref())?;

        let mime = sniff_mime(reference);
        debug!(mime, "attaching reference image");
        let image = Part::bytes(reference.to_vec())
            .file_name(format!("reference.{}", mime.trim_start_matches("image/")))
            .mime_str(mime)
            .map_err(|e| DomainError::Internal(format!("invalid reference part: {e}")))?;
        let form = Form::new()
            .text("model", self.model.clone())
            .text("prompt", prompt.to_owned())
            .text("size", size.to_owned())
            .part("image", image);

        let started = Instant::now();
        let response = self
            .client
            .post(&self.edits_endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        let image = first_image(read_json(response).await?)?;

        info!(
            duration_ms = started.elapsed().as_millis(),
            bytes = image.len(),
            "image edit finished"
        );
        Ok(image)
    }
}
