use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use std::time::Duration;

use crate::errors::AppError;
use crate::translation::backoff::{BackoffPolicy, Growth};
use crate::translation::glossary::{Glossary, GlossaryEntry};
use crate::translation::json_walker::JsonPolicy;

/// Application configuration module
/// This module handles loading and validating the configuration file.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO, optional region: `ja`, `ja-JP`)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Which documents are picked up
    #[serde(default)]
    pub documents: DocumentConfig,

    /// JSON inclusion policy
    #[serde(default)]
    pub json: JsonPolicy,

    /// Inline glossary entries
    #[serde(default)]
    pub glossary: Vec<GlossaryEntry>,

    /// Optional glossary file, merged after the inline entries
    #[serde(default)]
    pub glossary_path: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: OpenAI-compatible chat completions
    OpenAI,
    // @provider: DeepL translate API
    DeepL,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::DeepL => "DeepL",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::DeepL => "deepl".to_string(),
        }
    }

    // @returns: Environment variable read when no key is configured
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::DeepL => "DEEPL_API_KEY",
        }
    }

    // @returns: Retry policy used when the config has none
    pub fn default_retry(&self) -> RetryConfig {
        match self {
            // Chat endpoint: exponential, 2s, 4s, 8s, 16s
            Self::OpenAI => RetryConfig {
                max_attempts: 5,
                base_delay_ms: 2000,
                growth: Growth::Exponential,
                factor: 2.0,
                max_delay_ms: 60_000,
            },
            // DeepL: linear, 5s, 10s
            Self::DeepL => RetryConfig {
                max_attempts: 3,
                base_delay_ms: 5000,
                growth: Growth::Linear,
                factor: 1.0,
                max_delay_ms: 30_000,
            },
        }
    }
}

// Implement Display trait for ProviderKind
impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for ProviderKind
impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "deepl" => Ok(Self::DeepL),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Retry settings for one provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    // @field: Attempts per chunk, first request included
    pub max_attempts: u32,

    // @field: First retry delay
    pub base_delay_ms: u64,

    // @field: exponential | linear
    pub growth: Growth,

    // @field: Multiplier for exponential growth
    #[serde(default = "default_factor")]
    pub factor: f64,

    // @field: Cap for a single delay
    pub max_delay_ms: u64,
}

impl RetryConfig {
    pub fn to_policy(&self) -> BackoffPolicy {
        let base = Duration::from_millis(self.base_delay_ms);
        let cap = Duration::from_millis(self.max_delay_ms);
        match self.growth {
            Growth::Exponential => BackoffPolicy::exponential(self.max_attempts, base, self.factor, cap),
            Growth::Linear => BackoffPolicy::linear(self.max_attempts, base, cap),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: ProviderKind,

    // @field: Model name (chat providers only)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key, takes precedence over the environment
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,

    // @field: Service URL (empty: provider default)
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retry policy (None: provider default)
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: ProviderKind) -> Self {
        match provider_type {
            ProviderKind::OpenAI => Self {
                provider_type,
                model: default_openai_model(),
                api_key: String::new(),
                api_key_env: None,
                endpoint: default_openai_endpoint(),
                timeout_secs: default_timeout_secs(),
                retry: None,
            },
            ProviderKind::DeepL => Self {
                provider_type,
                model: String::new(),
                api_key: String::new(),
                api_key_env: None,
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
                retry: None,
            },
        }
    }

    /// Resolve the credential, inline key first, then the environment.
    ///
    /// Returns None when no non-empty credential is available.
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.trim().to_string());
        }
        let var = self
            .api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider_type.default_api_key_env());
        std::env::var(var)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    /// Model name with the provider default filled in
    pub fn get_model(&self) -> String {
        if self.model.is_empty() {
            default_openai_model()
        } else {
            self.model.clone()
        }
    }

    /// Endpoint with the provider default filled in; DeepL picks its own
    /// host from the key when left empty
    pub fn get_endpoint(&self) -> String {
        match self.provider_type {
            ProviderKind::OpenAI if self.endpoint.trim().is_empty() => default_openai_endpoint(),
            _ => self.endpoint.trim().to_string(),
        }
    }

    /// Effective retry policy
    pub fn backoff_policy(&self) -> BackoffPolicy {
        self.retry
            .clone()
            .unwrap_or_else(|| self.provider_type.default_retry())
            .to_policy()
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Providers in fallback order
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    /// Maximum characters per provider request
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Delay between consecutive chunks of one document
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,

    /// Delay between documents
    #[serde(default = "default_document_delay_ms")]
    pub document_delay_ms: u64,

    /// System prompt template for chat providers
    /// Placeholders: {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Temperature parameter for chat providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            max_chunk_chars: default_max_chunk_chars(),
            chunk_delay_ms: default_chunk_delay_ms(),
            document_delay_ms: default_document_delay_ms(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
        }
    }
}

/// Document selection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentConfig {
    /// Translate plain-text/markdown documents
    #[serde(default = "default_true")]
    pub translate_text: bool,

    /// Translate JSON documents
    #[serde(default = "default_true")]
    pub translate_json: bool,

    /// Eligible extensions, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Patterns (`*`, `**`, `?`) matched against paths relative to the input root
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            translate_text: true,
            translate_json: true,
            extensions: default_extensions(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_target_language() -> String {
    "ja".to_string()
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(ProviderKind::OpenAI),
        ProviderConfig::new(ProviderKind::DeepL),
    ]
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_factor() -> f64 {
    2.0
}

fn default_max_chunk_chars() -> usize {
    crate::translation::chunker::DEFAULT_MAX_CHUNK_CHARS
}

fn default_chunk_delay_ms() -> u64 {
    500 // 500ms between chunks of one document
}

fn default_document_delay_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    ["md", "markdown", "txt", "json"].iter().map(|s| s.to_string()).collect()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_system_prompt() -> String {
    crate::providers::openai::DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Config {
    /// Load a configuration file; a missing or unreadable file is fatal
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::MissingConfiguration(format!(
                "config file not found: {}",
                path.display()
            ))
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        crate::language_utils::validate_language_code(&self.target_language)
            .map_err(|e| AppError::MissingConfiguration(e.to_string()))?;

        if self.translation.providers.is_empty() {
            return Err(AppError::MissingConfiguration(
                "at least one translation provider must be listed".to_string(),
            ));
        }

        if self.translation.max_chunk_chars == 0 {
            return Err(AppError::MissingConfiguration(
                "translation.max_chunk_chars must be greater than zero".to_string(),
            ));
        }

        for provider in &self.translation.providers {
            let endpoint = provider.get_endpoint();
            if !endpoint.is_empty() {
                url::Url::parse(&endpoint).map_err(|e| {
                    AppError::MissingConfiguration(format!(
                        "invalid endpoint for {}: {} ({})",
                        provider.provider_type.display_name(),
                        endpoint,
                        e
                    ))
                })?;
            }
        }

        if !self.documents.translate_text && !self.documents.translate_json {
            return Err(AppError::MissingConfiguration(
                "both text and JSON translation are disabled".to_string(),
            ));
        }

        Ok(())
    }

    /// Inline glossary entries followed by the glossary file, if any
    pub fn load_glossary(&self) -> Result<Glossary> {
        let mut entries = self.glossary.clone();
        if let Some(path) = &self.glossary_path {
            entries.extend(Glossary::load_entries(path)?);
        }
        Ok(Glossary::new(entries))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            documents: DocumentConfig::default(),
            json: JsonPolicy::default(),
            glossary: Vec::new(),
            glossary_path: None,
            log_level: LogLevel::default(),
        }
    }
}
