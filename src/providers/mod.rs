/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported services:
 * - OpenAI: chat-completion style translation with a system instruction
 * - DeepL: dedicated machine-translation API
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::translation::backoff::BackoffPolicy;

/// HTTP statuses that are worth retrying against the same provider
pub const RETRYABLE_STATUSES: &[u16] = &[429, 500, 502, 503];

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the fallback chain.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Stable identifier used in logs and attempt records
    fn id(&self) -> &str;

    /// Retry policy applied when this provider reports a retryable error
    fn backoff(&self) -> &BackoffPolicy;

    /// Translate one chunk of text into the target language
    ///
    /// # Arguments
    /// * `text` - The chunk to translate
    /// * `target_language` - Target language code as configured
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or a classified error
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;
}

/// Classify a non-success HTTP status into a provider error
pub fn classify_status(status_code: u16, message: String) -> ProviderError {
    if RETRYABLE_STATUSES.contains(&status_code) {
        ProviderError::Transient { status_code, message }
    } else if status_code == 401 || status_code == 403 {
        ProviderError::AuthenticationError(message)
    } else {
        ProviderError::ApiError { status_code, message }
    }
}

/// Map a transport-level reqwest failure onto a provider error
pub fn classify_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_decode() {
        ProviderError::ParseError(error.to_string())
    } else {
        ProviderError::ConnectionError(error.to_string())
    }
}

pub mod deepl;
pub mod mock;
pub mod openai;
