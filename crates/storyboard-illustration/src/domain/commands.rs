//! Commands for the Illustration context.

use storyboard_core::command::Command;
use uuid::Uuid;

use crate::domain::plan::GenerationRequest;

/// Command to render one panel of an edited block.
#[derive(Debug, Clone)]
pub struct GeneratePanel {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Block text holding the background and panel prompts.
    pub block: String,
    /// Which panel to render and how.
    pub request: GenerationRequest,
}

impl Command for GeneratePanel {
    fn command_type(&self) -> &'static str {
        "illustration.generate_panel"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
