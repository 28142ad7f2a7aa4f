//! Storyboard API — error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storyboard_core::error::{DomainError, ErrorCategory};
use thiserror::Error;
use tracing::error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider construction failed.
    #[error("provider error: {0}")]
    Provider(#[from] DomainError),

    /// Tracing or span exporter initialization failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCategory::UpstreamProtocol | ErrorCategory::UpstreamNetwork => {
            StatusCode::BAD_GATEWAY
        }
        ErrorCategory::UpstreamUnavailable | ErrorCategory::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn code_for(err: &DomainError) -> &'static str {
    match err {
        DomainError::NoPanelsFound => "no_panels_found",
        DomainError::InvalidPanelIndex(_) => "invalid_panel_index",
        DomainError::PanelIndexOutOfRange { .. } => "panel_index_out_of_range",
        DomainError::InvalidReferenceImage(_) => "invalid_reference_image",
        DomainError::Validation(_) => "validation_error",
        DomainError::UpstreamUnavailable(_) => "upstream_unavailable",
        DomainError::InvalidUpstreamOutput(_) => "invalid_upstream_output",
        DomainError::UpstreamStatus { .. } => "upstream_error",
        DomainError::UpstreamNetwork(_) => "upstream_network_error",
        DomainError::Internal(_) => "internal_error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let category = self.0.category();
        let status = status_for(category);

        let message = if category == ErrorCategory::Internal {
            error!(error = %self.0, "unhandled server error");
            "internal server error".to_owned()
        } else {
            if status.is_server_error() {
                error!(error = %self.0, status = status.as_u16(), "request failed upstream");
            }
            self.0.to_string()
        };

        let body = ErrorBody {
            error: code_for(&self.0),
            message,
        };

        (status, Json(body)).into_response()
    }
}
