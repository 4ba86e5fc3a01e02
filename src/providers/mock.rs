/*!
 * Mock backend implementations for testing.
 *
 * This module provides mock backends that simulate different behaviors:
 * - `MockBackend::working()` - Always succeeds with a pseudo-translation
 * - `MockBackend::with_dictionary()` - Succeeds using a fixed lookup table
 * - `MockBackend::short_count()` - Returns one translation too few
 * - `MockBackend::failing_auth()` - Always fails with a permanent error
 * - `MockBackend::rate_limited()` - Fails transiently N times, then succeeds
 */

// Allow dead code - these stubs are consumed by the test suite
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with one translation per input
    Working,
    /// Succeeds but drops the last translation
    ShortCount,
    /// Always fails with an authentication error (permanent)
    FailingAuth,
    /// Fails with a rate-limit error for the first N calls, then succeeds
    RateLimited {
        /// Number of leading calls that fail
        fail_first: usize,
    },
}

/// Mock backend for testing translation behavior
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Fixed translations; unmapped texts get a `[KO]` prefix
    dictionary: HashMap<String, String>,
    /// Number of translate_batch calls made
    call_count: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            dictionary: HashMap::new(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock backend that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a working mock backend with a fixed translation table
    pub fn with_dictionary(pairs: &[(&str, &str)]) -> Self {
        let mut backend = Self::new(MockBehavior::Working);
        backend.dictionary = pairs
            .iter()
            .map(|(source, target)| (source.to_string(), target.to_string()))
            .collect();
        backend
    }

    /// Create a mock backend that returns one translation too few
    pub fn short_count() -> Self {
        Self::new(MockBehavior::ShortCount)
    }

    /// Create a mock backend that always fails with an authentication error
    pub fn failing_auth() -> Self {
        Self::new(MockBehavior::FailingAuth)
    }

    /// Create a mock backend that fails transiently for the first N calls
    pub fn rate_limited(fail_first: usize) -> Self {
        Self::new(MockBehavior::RateLimited { fail_first })
    }

    /// Number of translate_batch calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter, for asserting after a move
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    fn translate_one(&self, text: &str) -> String {
        self.dictionary
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[KO] {}", text))
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(texts.iter().map(|t| self.translate_one(t)).collect()),
            MockBehavior::ShortCount => {
                let mut translated: Vec<String> =
                    texts.iter().map(|t| self.translate_one(t)).collect();
                translated.pop();
                Ok(translated)
            }
            MockBehavior::FailingAuth => Err(ProviderError::AuthenticationError(
                "API key not valid".to_string(),
            )),
            MockBehavior::RateLimited { fail_first } => {
                if call < fail_first {
                    Err(ProviderError::RateLimitExceeded(
                        "quota exceeded, retry later".to_string(),
                    ))
                } else {
                    Ok(texts.iter().map(|t| self.translate_one(t)).collect())
                }
            }
        }
    }
}
