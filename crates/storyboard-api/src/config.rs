//! Server configuration read from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use storyboard_providers::OpenAiSettings;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Which provider implementations back the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Live OpenAI-compatible HTTP API.
    OpenAi,
    /// Deterministic offline fixtures.
    Fixture,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "fixture" | "mock" => Ok(Self::Fixture),
            other => Err(AppError::Config(format!(
                "STORYBOARD_PROVIDER must be `openai` or `fixture`, got `{other}`"
            ))),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Provider implementation to use.
    pub provider: ProviderKind,
    /// Upstream connection settings, used when `provider` is `OpenAi`.
    pub openai: OpenAiSettings,
    /// Maximum accepted request body size.
    pub max_body_bytes: usize,
    /// OTLP gRPC endpoint; span export is disabled when absent.
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let provider = match get("STORYBOARD_PROVIDER") {
            Some(value) => value.parse()?,
            None => ProviderKind::OpenAi,
        };
        let timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|e| {
                AppError::Config(format!("UPSTREAM_TIMEOUT_SECS must be a whole number: {e}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(value) => value.parse().map_err(|e| {
                AppError::Config(format!("MAX_BODY_BYTES must be a whole number: {e}"))
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            provider,
            openai: OpenAiSettings {
                api_key: get("OPENAI_API_KEY"),
                base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
                completion_model: get("COMPLETION_MODEL")
                    .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_owned()),
                image_model: get("IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_owned()),
                timeout: Duration::from_secs(timeout_secs),
            },
            max_body_bytes,
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// Socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn bind_address(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
