//! Storyboard API server entry point.

use std::error::Error;

use storyboard_api::config::{AppConfig, ProviderKind};
use storyboard_api::state::AppState;
use storyboard_api::{build_router, telemetry};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env before reading configuration; a missing file is fine.
    let dotenv = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    let tracer_provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting storyboard API server");
    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    match config.provider {
        ProviderKind::OpenAi if config.openai.api_key.is_none() => {
            tracing::warn!("OPENAI_API_KEY is not set; upstream requests will fail");
        }
        ProviderKind::OpenAi => {
            tracing::info!(
                completion_model = %config.openai.completion_model,
                image_model = %config.openai.image_model,
                "Using OpenAI-compatible providers"
            );
        }
        ProviderKind::Fixture => tracing::info!("Using fixture providers"),
    }

    let app_state = AppState::from_config(&config)?;
    let app = build_router(app_state, config.max_body_bytes);

    let addr = config.bind_address()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "failed to flush spans on shutdown");
        }
    }

    Ok(())
}
