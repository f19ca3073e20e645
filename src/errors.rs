/*!
 * Error types for the yadtwai application.
 *
 * This module contains custom error types for the different layers of the
 * translation run, using the thiserror crate for ergonomic error definitions:
 * - `ProviderError`: one failed request against one provider
 * - `TranslationError`: a document could not be translated
 * - `AppError`: fatal configuration problems found before the run starts
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The provider answered with a status worth retrying (rate limit, busy server)
    #[error("Transient API error: {status_code} - {message}")]
    Transient {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The account or plan behind the credential has no quota left
    #[error("Quota exhausted: {0}")]
    QuotaExceeded(String),

    /// Error returned by the API that retrying will not fix
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether the same provider may be asked again after a backoff delay
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::ConnectionError(_))
    }
}

/// Errors that can occur while translating a single document
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Every configured provider failed for one chunk of the document
    #[error("All providers exhausted after {attempts} attempt(s); last error: {last_error}")]
    ProvidersExhausted {
        /// Total number of requests issued across all providers
        attempts: u32,
        /// The final error seen before giving up
        last_error: String,
    },

    /// No provider was available to try at all
    #[error("No translation provider is configured")]
    NoProviders,

    /// A structured document could not be parsed
    #[error("Malformed structured input: {0}")]
    MalformedStructuredInput(String),
}

/// Run-level errors that stop the application before any document
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration is missing or unusable; aborts the run before any document
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),
}
