//! Commands for the Prompt Synthesis context.

use storyboard_core::command::Command;
use uuid::Uuid;

/// Command to turn a story into a background and eight panel prompts.
#[derive(Debug, Clone)]
pub struct SynthesizePrompts {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Free-text story, in any language.
    pub story: String,
}

impl Command for SynthesizePrompts {
    fn command_type(&self) -> &'static str {
        "synthesis.synthesize_prompts"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
