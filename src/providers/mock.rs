/*!
 * Mock provider implementation for testing.
 *
 * The mock replays a script of replies, one per request, and falls back to
 * a default behavior once the script is used up:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::failing()` - Always fails with the given status
 * - `MockProvider::scripted()` - Replays the given replies, then succeeds
 */

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::deepl::DeepL;
use crate::providers::Provider;
use crate::translation::backoff::BackoffPolicy;

/// One scripted reply
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Succeed using the response generator
    Translate,
    /// Succeed with fixed text
    Text(String),
    /// Fail with an HTTP status, classified like a real provider would
    Status(u16),
    /// Fail with a specific error
    Error(ProviderError),
}

/// Mock provider for testing fallback behavior
#[derive(Debug)]
pub struct MockProvider {
    id: String,
    backoff: BackoffPolicy,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    /// Behavior once the script is empty
    fallback: MockReply,
    /// Request counter shared between clones
    request_count: Arc<AtomicUsize>,
    /// Received texts, in order
    received: Arc<Mutex<Vec<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str, &str) -> String>,
}

impl MockProvider {
    /// Create a mock with a script and a fallback behavior
    pub fn new(id: impl Into<String>, script: Vec<MockReply>, fallback: MockReply) -> Self {
        Self {
            id: id.into(),
            backoff: BackoffPolicy::immediate(3),
            script: Arc::new(Mutex::new(script.into())),
            fallback,
            request_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working(id: impl Into<String>) -> Self {
        Self::new(id, Vec::new(), MockReply::Translate)
    }

    /// Create a failing mock provider that always answers with `status`
    pub fn failing(id: impl Into<String>, status: u16) -> Self {
        Self::new(id, Vec::new(), MockReply::Status(status))
    }

    /// Replay `script`, then succeed
    pub fn scripted(id: impl Into<String>, script: Vec<MockReply>) -> Self {
        Self::new(id, script, MockReply::Translate)
    }

    /// Set the retry policy
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set a custom response generator taking `(text, target_language)`
    pub fn with_custom_response(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts received so far
    pub fn received(&self) -> Vec<String> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Default translation used by `MockReply::Translate`
    pub fn default_translation(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }

    fn next_reply(&self) -> MockReply {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            backoff: self.backoff.clone(),
            script: Arc::clone(&self.script),
            fallback: self.fallback.clone(),
            request_count: Arc::clone(&self.request_count),
            received: Arc::clone(&self.received),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.push(text.to_string());
        }

        match self.next_reply() {
            MockReply::Translate => {
                let generator = self.custom_response.unwrap_or(Self::default_translation);
                Ok(generator(text, target_language))
            }
            MockReply::Text(fixed) => Ok(fixed),
            MockReply::Status(status) => Err(DeepL::classify(status, format!("Simulated status {}", status))),
            MockReply::Error(error) => Err(error),
        }
    }
}
