/*!
 * Multi-provider fallback with per-provider retry.
 *
 * A chunk is offered to each provider in configured order. Every request
 * yields an `AttemptOutcome`:
 * - `Success` ends the chain,
 * - `Retryable` waits according to the provider's backoff policy and asks
 *   the same provider again until its attempt cap is reached,
 * - `Unrecoverable` moves on to the next provider immediately.
 *
 * Provider errors never escape this module; callers only see a translated
 * chunk or `TranslationError::ProvidersExhausted`.
 */

use log::{debug, warn};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;

/// Classified result of one provider request
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(String),
    Retryable(ProviderError),
    Unrecoverable(ProviderError),
}

impl AttemptOutcome {
    /// Classify a raw provider result
    pub fn classify(result: Result<String, ProviderError>) -> Self {
        match result {
            Ok(text) => Self::Success(text),
            Err(error) if error.is_retryable() => Self::Retryable(error),
            Err(error) => Self::Unrecoverable(error),
        }
    }
}

/// Record of a single request against a provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderAttempt {
    pub provider_id: String,
    /// 1-based attempt number for this provider
    pub attempt: u32,
    pub outcome: AttemptOutcome,
}

/// A successfully translated chunk
#[derive(Debug, Clone)]
pub struct TranslatedChunk {
    pub text: String,
    /// Provider that produced the text
    pub provider_id: String,
    /// Number of retries consumed across the chain
    pub retries: u32,
    /// Every request made for this chunk, in order
    pub attempts: Vec<ProviderAttempt>,
}

/// Ordered list of providers tried for every chunk
#[derive(Debug, Clone, Default)]
pub struct FallbackChain {
    providers: Vec<Arc<dyn Provider>>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Provider identifiers in fallback order
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.id().to_string()).collect()
    }

    /// Translate one chunk, walking the chain until a provider succeeds
    pub async fn translate_chunk(
        &self,
        chunk: &str,
        target_language: &str,
    ) -> Result<TranslatedChunk, TranslationError> {
        if self.providers.is_empty() {
            return Err(TranslationError::NoProviders);
        }

        let mut trail: Vec<ProviderAttempt> = Vec::new();
        let mut retries = 0u32;
        let mut last_error: Option<ProviderError> = None;

        for provider in &self.providers {
            let policy = provider.backoff();
            let mut attempt = 0u32;

            loop {
                attempt += 1;
                let outcome = AttemptOutcome::classify(provider.translate(chunk, target_language).await);
                trail.push(ProviderAttempt {
                    provider_id: provider.id().to_string(),
                    attempt,
                    outcome: outcome.clone(),
                });

                match outcome {
                    AttemptOutcome::Success(text) => {
                        debug!("Chunk translated by {} on attempt {}", provider.id(), attempt);
                        return Ok(TranslatedChunk {
                            text,
                            provider_id: provider.id().to_string(),
                            retries,
                            attempts: trail,
                        });
                    }
                    AttemptOutcome::Retryable(error) => {
                        if policy.allows_another(attempt) {
                            let delay = policy.delay_for_retry(attempt);
                            warn!(
                                "{} failed ({}), retrying in {:?} - attempt {}/{}",
                                provider.id(), error, delay, attempt + 1, policy.max_attempts
                            );
                            last_error = Some(error);
                            retries += 1;
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        warn!("{} gave up after {} attempt(s): {}", provider.id(), attempt, error);
                        last_error = Some(error);
                        break;
                    }
                    AttemptOutcome::Unrecoverable(error) => {
                        warn!("{} cannot serve this request, falling back: {}", provider.id(), error);
                        last_error = Some(error);
                        break;
                    }
                }
            }
        }

        Err(TranslationError::ProvidersExhausted {
            attempts: trail.len() as u32,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no provider responded".to_string()),
        })
    }
}
