//! Domain error types.

use thiserror::Error;

/// Coarse classification of a [`DomainError`], used by the transport layer to
/// decide who is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller sent something unusable.
    InvalidRequest,
    /// The upstream model API cannot be reached with the current configuration.
    UpstreamUnavailable,
    /// The upstream model API answered with something we could not use.
    UpstreamProtocol,
    /// Transport failure reaching the upstream model API.
    UpstreamNetwork,
    /// Anything unanticipated.
    Internal,
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The block contained no `[PROMPT n]` headers.
    #[error("no panels found in block")]
    NoPanelsFound,

    /// The requested panel index is below 1.
    #[error("panel index must be at least 1, got {0}")]
    InvalidPanelIndex(i64),

    /// The requested panel index is beyond the available panels.
    #[error("panel index {index} is out of range (found {total} panels)")]
    PanelIndexOutOfRange {
        /// The requested 1-based index.
        index: i64,
        /// Number of panels available after truncation.
        total: usize,
    },

    /// The previous-panel image could not be decoded.
    #[error("invalid reference image: {0}")]
    InvalidReferenceImage(String),

    /// A validation error in caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Upstream credentials are missing.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream payload could not be decoded into the expected shape.
    #[error("invalid upstream output: {0}")]
    InvalidUpstreamOutput(String),

    /// The upstream API answered with a non-success status.
    #[error("upstream returned status {status}: {message}")]
    UpstreamStatus {
        /// HTTP status code returned upstream.
        status: u16,
        /// Response body or error message.
        message: String,
    },

    /// Transport failure reaching the upstream API.
    #[error("upstream network error: {0}")]
    UpstreamNetwork(String),

    /// Catch-all for unanticipated failures.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Returns the category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoPanelsFound
            | Self::InvalidPanelIndex(_)
            | Self::PanelIndexOutOfRange { .. }
            | Self::InvalidReferenceImage(_)
            | Self::Validation(_) => ErrorCategory::InvalidRequest,
            Self::UpstreamUnavailable(_) => ErrorCategory::UpstreamUnavailable,
            Self::InvalidUpstreamOutput(_) | Self::UpstreamStatus { .. } => {
                ErrorCategory::UpstreamProtocol
            }
            Self::UpstreamNetwork(_) => ErrorCategory::UpstreamNetwork,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}
