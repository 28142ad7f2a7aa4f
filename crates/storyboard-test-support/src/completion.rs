//! Test completion providers — mock `CompletionProvider` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use storyboard_core::error::DomainError;
use storyboard_core::provider::CompletionProvider;

/// A completion provider that returns the same content on every call and
/// records each `(system, user)` pair it receives.
#[derive(Debug)]
pub struct ScriptedCompletionProvider {
    content: String,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedCompletionProvider {
    /// Create a provider that answers every call with `content`.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all `(system, user)` messages received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletionProvider {
    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete_json(&self, system: &str, user: &str) -> Result<String, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_owned(), user.to_owned()));
        Ok(self.content.clone())
    }
}

/// A completion provider that always fails with a network error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingCompletionProvider;

#[async_trait]
impl CompletionProvider for FailingCompletionProvider {
    fn model(&self) -> &str {
        "failing-model"
    }

    async fn complete_json(&self, _system: &str, _user: &str) -> Result<String, DomainError> {
        Err(DomainError::UpstreamNetwork("connection refused".into()))
    }
}
