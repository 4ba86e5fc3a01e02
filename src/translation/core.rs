/*!
 * Core translation service implementation.
 *
 * Wraps a `TranslationBackend` with the contract the pipeline relies on:
 * positional output validation and bounded retry-with-backoff for
 * transient failures. Permanent failures surface immediately.
 */

use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::app_config::Config;
use crate::errors::{ConfigError, TranslationError};
use crate::providers::TranslationBackend;
use crate::providers::gemini::GeminiBackend;

/// Translation service over an arbitrary backend
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// The backend doing the actual translation
    backend: Arc<dyn TranslationBackend>,
    /// Maximum number of retries after the initial attempt
    retry_count: u32,
    /// Base backoff delay in milliseconds, doubled on each retry
    retry_backoff_ms: u64,
}

impl TranslationService {
    /// Create a service around an existing backend
    pub fn new(backend: Arc<dyn TranslationBackend>, retry_count: u32, retry_backoff_ms: u64) -> Self {
        Self {
            backend,
            retry_count,
            retry_backoff_ms,
        }
    }

    /// Create a service with the Gemini backend described by the configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let backend = GeminiBackend::from_config(config)?;
        Ok(Self::new(
            Arc::new(backend),
            config.translation.common.retry_count,
            config.translation.common.retry_backoff_ms,
        ))
    }

    /// Translate one batch of text blocks.
    ///
    /// The result always has exactly one block per input, in input order;
    /// a backend answer of any other length is rejected. Transient backend
    /// failures are retried with exponential backoff, permanent ones are
    /// not.
    pub async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>, TranslationError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut attempt: u32 = 0;
        loop {
            match self.backend.translate_batch(texts).await {
                Ok(translated) => {
                    if translated.len() != texts.len() {
                        return Err(TranslationError::CountMismatch {
                            expected: texts.len(),
                            actual: translated.len(),
                        });
                    }
                    return Ok(translated);
                }
                Err(e) if e.is_transient() => {
                    if attempt >= self.retry_count {
                        return Err(TranslationError::RetriesExhausted {
                            attempts: attempt + 1,
                            last_error: e.to_string(),
                        });
                    }

                    attempt += 1;
                    // Cap the shift so pathological retry counts cannot overflow
                    let delay_ms = self
                        .retry_backoff_ms
                        .saturating_mul(1u64 << (attempt - 1).min(16));
                    warn!(
                        "Transient backend failure (attempt {}/{}), retrying in {} ms: {}",
                        attempt,
                        self.retry_count,
                        delay_ms,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(TranslationError::Provider(e)),
            }
        }
    }
}
