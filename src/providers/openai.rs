use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{Provider, classify_status, classify_transport_error};
use crate::translation::backoff::BackoffPolicy;

/// Default system instruction; `{target_language}` is substituted per request
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional technical translator. Translate the user's text into {target_language}. Preserve Markdown structure, code, JSON, URLs and placeholders such as {name} or %s exactly as they appear. Return only the translated text.";

/// OpenAI-compatible chat client used as a translation provider
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL (e.g. https://api.openai.com/v1)
    endpoint: String,
    /// Model name
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// System prompt template
    system_prompt: String,
    /// Retry policy
    backoff: BackoffPolicy,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// The model to use
    model: String,
    /// The messages for the conversation
    messages: Vec<ChatMessage>,
    /// Temperature for generation
    temperature: f32,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Candidate completions
    pub choices: Vec<ChatChoice>,
}

/// Individual choice in a chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
}

impl OpenAI {
    /// Create a new client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
        backoff: BackoffPolicy,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            temperature: 0.3,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            backoff,
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the system prompt template
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    /// Build the request body for one chunk
    pub fn build_request(&self, text: &str, target_language: &str) -> ChatRequest {
        let language = language_utils::get_language_name(target_language)
            .unwrap_or_else(|_| target_language.to_string());
        let system = self.system_prompt.replace("{target_language}", &language);

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system },
                ChatMessage { role: "user".to_string(), content: text.to_string() },
            ],
            temperature: self.temperature,
        }
    }

    /// Extract the translated text from a chat completion response
    pub fn extract_text(response: ChatResponse) -> Result<String, ProviderError> {
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))
    }
}

#[async_trait]
impl Provider for OpenAI {
    fn id(&self) -> &str {
        "openai"
    }

    fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let request = self.build_request(text, target_language);

        let response = self.client.post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);

            // A 429 can also mean the account is out of credit, which no backoff fixes
            if status.as_u16() == 429 && error_text.contains("insufficient_quota") {
                return Err(ProviderError::QuotaExceeded(error_text));
            }
            return Err(classify_status(status.as_u16(), error_text));
        }

        let chat_response = response.json::<ChatResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        let translated = Self::extract_text(chat_response)?;
        debug!("OpenAI translated {} chars into {} chars", text.chars().count(), translated.chars().count());
        Ok(translated)
    }
}
