//! Provider implementations for the storyboard service.
//!
//! `openai` talks to an OpenAI-compatible HTTP API; `fixture` answers
//! deterministically without any network access.

pub mod fixture;
pub mod openai;

pub use fixture::{FixtureCompletionProvider, FixtureImageProvider};
pub use openai::{OpenAiCompletionProvider, OpenAiImageProvider, OpenAiSettings};
