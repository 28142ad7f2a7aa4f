//! Shared test doubles for the storyboard service.

mod completion;
mod image;

pub use completion::{FailingCompletionProvider, ScriptedCompletionProvider};
pub use image::{FailingImageProvider, RecordedImageCall, RecordingImageProvider};
