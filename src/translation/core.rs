/*!
 * Core translation pipeline.
 *
 * This module wires the building blocks together:
 * segment → chunk → fallback chain → glossary → reassemble.
 *
 * `TranslationContext` is the immutable state shared by a whole run
 * (providers, glossary, JSON policy, limits). `DocumentTranslator` holds
 * the per-document state: pacing between chunks and simple counters.
 */

use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, ProviderKind};
use crate::errors::{AppError, TranslationError};
use crate::providers::Provider;
use crate::providers::deepl::DeepL;
use crate::providers::openai::OpenAI;
use super::chunker::{self, DEFAULT_MAX_CHUNK_CHARS};
use super::fallback::FallbackChain;
use super::glossary::Glossary;
use super::json_walker::{self, JsonPolicy};
use super::segmenter::{self, Segment};

/// Immutable context passed through every translation call
#[derive(Debug, Clone)]
pub struct TranslationContext {
    /// Target language code
    pub target_language: String,
    /// Providers in fallback order
    pub chain: FallbackChain,
    /// Terminology fixed after translation
    pub glossary: Glossary,
    /// Eligibility rules for JSON leaves
    pub json_policy: JsonPolicy,
    /// Maximum characters per provider request
    pub max_chunk_chars: usize,
    /// Pause between consecutive chunks of one document
    pub chunk_delay: Duration,
}

impl TranslationContext {
    /// Create a context with default limits and no glossary
    pub fn new(target_language: impl Into<String>, chain: FallbackChain) -> Self {
        Self {
            target_language: target_language.into(),
            chain,
            glossary: Glossary::default(),
            json_policy: JsonPolicy::default(),
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            chunk_delay: Duration::ZERO,
        }
    }

    pub fn with_glossary(mut self, glossary: Glossary) -> Self {
        self.glossary = glossary;
        self
    }

    pub fn with_json_policy(mut self, policy: JsonPolicy) -> Self {
        self.json_policy = policy;
        self
    }

    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars.max(1);
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Build the context from configuration.
    ///
    /// Providers without a credential are skipped. Having none left is a
    /// fatal configuration error.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let translation = &config.translation;
        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

        for provider_config in &translation.providers {
            let Some(api_key) = provider_config.resolve_api_key() else {
                debug!("No credential for {}, skipping", provider_config.provider_type.display_name());
                continue;
            };

            let backoff = provider_config.backoff_policy();
            let provider: Arc<dyn Provider> = match provider_config.provider_type {
                ProviderKind::OpenAI => Arc::new(
                    OpenAI::new(
                        api_key,
                        provider_config.get_endpoint(),
                        provider_config.get_model(),
                        provider_config.timeout_secs,
                        backoff,
                    )
                    .with_temperature(translation.temperature)
                    .with_system_prompt(translation.system_prompt.clone()),
                ),
                ProviderKind::DeepL => Arc::new(DeepL::new(
                    api_key,
                    provider_config.get_endpoint(),
                    provider_config.timeout_secs,
                    backoff,
                )),
            };
            providers.push(provider);
        }

        if providers.is_empty() {
            return Err(AppError::MissingConfiguration(
                "no translation provider has a credential".to_string(),
            ));
        }

        let glossary = config
            .load_glossary()
            .map_err(|e| AppError::MissingConfiguration(e.to_string()))?;

        let chain = FallbackChain::new(providers);
        info!(
            "Providers in fallback order: {} | glossary entries: {}",
            chain.provider_ids().join(" → "),
            glossary.len()
        );

        Ok(Self::new(config.target_language.clone(), chain)
            .with_glossary(glossary)
            .with_json_policy(config.json.clone())
            .with_max_chunk_chars(translation.max_chunk_chars)
            .with_chunk_delay(Duration::from_millis(translation.chunk_delay_ms)))
    }
}

/// Counters for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStats {
    /// Chunks sent to a provider and translated
    pub chunks_translated: usize,
    /// Retries consumed across all chunks
    pub retries: u32,
    /// JSON leaves translated
    pub leaves_translated: usize,
}

/// Split `s` into (leading whitespace, core, trailing whitespace)
fn split_surrounding_whitespace(s: &str) -> (&str, &str, &str) {
    let trimmed_start = s.trim_start();
    let leading = &s[..s.len() - trimmed_start.len()];
    let core = trimmed_start.trim_end();
    let trailing = &trimmed_start[core.len()..];
    (leading, core, trailing)
}

/// Translates one document against a shared context
pub struct DocumentTranslator<'a> {
    context: &'a TranslationContext,
    stats: DocumentStats,
}

impl<'a> DocumentTranslator<'a> {
    pub fn new(context: &'a TranslationContext) -> Self {
        Self { context, stats: DocumentStats::default() }
    }

    pub fn stats(&self) -> &DocumentStats {
        &self.stats
    }

    /// Translate plain text, leaving fenced code untouched.
    ///
    /// Any chunk that exhausts every provider aborts the whole text.
    pub async fn translate_text(&mut self, text: &str) -> Result<String, TranslationError> {
        let mut translated = Vec::new();

        for segment in segmenter::segment(text) {
            if segment.is_code() || segment.content.trim().is_empty() {
                translated.push(segment);
                continue;
            }

            let mut output = String::with_capacity(segment.content.len());
            for chunk in chunker::chunk_text(&segment.content, self.context.max_chunk_chars) {
                let (leading, core, trailing) = split_surrounding_whitespace(&chunk);
                output.push_str(leading);
                if !core.is_empty() {
                    let result = self.translate_chunk(core).await?;
                    output.push_str(&self.context.glossary.apply(&result));
                }
                output.push_str(trailing);
            }
            translated.push(Segment::text(output));
        }

        Ok(segmenter::reassemble(&translated))
    }

    /// Translate the eligible string leaves of a JSON document.
    ///
    /// The result is pretty-printed with two-space indentation and a
    /// trailing newline. Nothing is returned unless every leaf succeeded.
    pub async fn translate_json(&mut self, content: &str) -> Result<String, TranslationError> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| TranslationError::MalformedStructuredInput(e.to_string()))?;

        let policy = &self.context.json_policy;
        let sources = json_walker::collect_eligible(&value, policy);
        debug!("{} eligible JSON string(s)", sources.len());

        let mut translations = Vec::with_capacity(sources.len());
        for source in &sources {
            translations.push(self.translate_text(source).await?);
            self.stats.leaves_translated += 1;
        }

        let mut translated = translations.into_iter();
        let rebuilt = json_walker::map_eligible(value, "", policy, &mut |original| {
            translated.next().unwrap_or_else(|| original.to_string())
        });

        let mut out = serde_json::to_string_pretty(&rebuilt)
            .map_err(|e| TranslationError::MalformedStructuredInput(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }

    async fn translate_chunk(&mut self, chunk: &str) -> Result<String, TranslationError> {
        if self.stats.chunks_translated > 0 && !self.context.chunk_delay.is_zero() {
            tokio::time::sleep(self.context.chunk_delay).await;
        }

        let result = self
            .context
            .chain
            .translate_chunk(chunk, &self.context.target_language)
            .await?;

        self.stats.chunks_translated += 1;
        self.stats.retries += result.retries;
        Ok(result.text)
    }
}
