//! Command abstractions.

use uuid::Uuid;

/// A unit of work handled end to end by one of the service contexts.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name used in log records, e.g. `synthesis.synthesize_prompts`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID shared by every log record emitted for this command.
    fn correlation_id(&self) -> Uuid;
}
