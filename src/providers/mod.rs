/*!
 * Backend implementations for the translation service.
 *
 * This module contains the capability interface the translation service is
 * built against, plus the concrete backends:
 * - Gemini: Google Gemini generateContent API
 * - Mock: deterministic in-process stubs for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Capability interface for a translation backend
///
/// A backend takes an ordered list of source text blocks and returns an
/// ordered list of translated blocks, one per input. It sees text only;
/// timestamps, identifiers and cue settings never reach it. The language
/// pair is fixed when the backend is constructed.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate a batch of text blocks, preserving order and internal
    /// line breaks.
    ///
    /// # Arguments
    /// * `texts` - The source text blocks, one per cue
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - The translated blocks, positionally matching the input
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>, ProviderError>;
}

pub mod gemini;
pub mod mock;
