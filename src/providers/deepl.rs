use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{Provider, classify_status, classify_transport_error};
use crate::translation::backoff::BackoffPolicy;

/// Status DeepL uses when the character quota of the plan is used up
pub const QUOTA_EXCEEDED_STATUS: u16 = 456;

const FREE_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";
const PRO_ENDPOINT: &str = "https://api.deepl.com/v2/translate";

/// DeepL client used as a translation provider
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// Authentication key
    auth_key: String,
    /// Full translate URL
    endpoint: String,
    /// Retry policy
    backoff: BackoffPolicy,
}

/// Translate request
#[derive(Debug, Serialize)]
pub struct DeepLRequest {
    /// Texts to translate; one chunk per request here
    text: Vec<String>,
    /// DeepL target language code
    target_lang: String,
}

/// Translate response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    pub translations: Vec<DeepLTranslation>,
}

/// One translated text
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    #[serde(default)]
    pub detected_source_language: Option<String>,
    pub text: String,
}

impl DeepL {
    /// Create a new client; an empty endpoint picks free or pro from the key
    pub fn new(
        auth_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
        backoff: BackoffPolicy,
    ) -> Self {
        let auth_key = auth_key.into();
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() {
            Self::default_endpoint(&auth_key).to_string()
        } else {
            endpoint
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            auth_key,
            endpoint,
            backoff,
        }
    }

    /// Free-plan keys end in `:fx` and must use the free host
    pub fn default_endpoint(auth_key: &str) -> &'static str {
        if auth_key.ends_with(":fx") {
            FREE_ENDPOINT
        } else {
            PRO_ENDPOINT
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request body for one chunk
    pub fn build_request(text: &str, target_language: &str) -> DeepLRequest {
        DeepLRequest {
            text: vec![text.to_string()],
            target_lang: language_utils::deepl_target_code(target_language),
        }
    }

    /// Extract the translated text from a response
    pub fn extract_text(response: DeepLResponse) -> Result<String, ProviderError> {
        response
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| ProviderError::ParseError("response contained no translations".to_string()))
    }

    /// DeepL-specific status classification
    pub fn classify(status_code: u16, message: String) -> ProviderError {
        if status_code == QUOTA_EXCEEDED_STATUS {
            ProviderError::QuotaExceeded(message)
        } else {
            classify_status(status_code, message)
        }
    }
}

#[async_trait]
impl Provider for DeepL {
    fn id(&self) -> &str {
        "deepl"
    }

    fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let request = Self::build_request(text, target_language);

        let response = self.client.post(&self.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key))
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepL API error ({}): {}", status, error_text);
            return Err(Self::classify(status.as_u16(), error_text));
        }

        let deepl_response = response.json::<DeepLResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        let translated = Self::extract_text(deepl_response)?;
        debug!("DeepL translated {} chars into {} chars", text.chars().count(), translated.chars().count());
        Ok(translated)
    }
}
