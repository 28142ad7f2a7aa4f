//! Test image providers — mock `ImageProvider` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use storyboard_core::error::DomainError;
use storyboard_core::provider::ImageProvider;

/// One call received by a [`RecordingImageProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedImageCall {
    /// Prompt text sent.
    pub prompt: String,
    /// Requested size.
    pub size: String,
    /// Reference image bytes; `Some` only for edit calls.
    pub reference: Option<Vec<u8>>,
}

/// An image provider that returns fixed bytes and records every call.
#[derive(Debug)]
pub struct RecordingImageProvider {
    image: Vec<u8>,
    calls: Mutex<Vec<RecordedImageCall>>,
}

impl RecordingImageProvider {
    /// Create a provider that answers every call with `image`.
    #[must_use]
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all calls received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<RecordedImageCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, prompt: &str, size: &str, reference: Option<&[u8]>) -> Vec<u8> {
        self.calls.lock().unwrap().push(RecordedImageCall {
            prompt: prompt.to_owned(),
            size: size.to_owned(),
            reference: reference.map(<[u8]>::to_vec),
        });
        self.image.clone()
    }
}

impl Default for RecordingImageProvider {
    fn default() -> Self {
        Self::new(b"image-bytes".to_vec())
    }
}

#[async_trait]
impl ImageProvider for RecordingImageProvider {
    async fn generate(&self, prompt: &str, size: &str) -> Result<Vec<u8>, DomainError> {
        Ok(self.record(prompt, size, None))
    }

    async fn edit(
        &self,
        prompt: &str,
        size: &str,
        reference: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        Ok(self.record(prompt, size, Some(reference)))
    }
}

/// An image provider whose responses never carry image data.
#[derive(Debug)]
pub struct FailingImageProvider;

#[async_trait]
impl ImageProvider for FailingImageProvider {
    async fn generate(&self, _prompt: &str, _size: &str) -> Result<Vec<u8>, DomainError> {
        Err(DomainError::InvalidUpstreamOutput(
            "image response missing b64_json".into(),
        ))
    }

    async fn edit(
        &self,
        _prompt: &str,
        _size: &str,
        _reference: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        Err(DomainError::InvalidUpstreamOutput(
            "image response missing b64_json".into(),
        ))
    }
}
