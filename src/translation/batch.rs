/*!
 * Batch translation processing.
 *
 * Drives the translation service over the ordered batch list, strictly one
 * batch at a time: a batch is only issued after the previous one's result
 * is in. This keeps output order trivially deterministic and API usage
 * predictable. Any batch failure aborts the whole run.
 */

use log::{debug, info};

use crate::errors::TranslationError;

use super::core::TranslationService;

/// Sequential batch driver for the translation service
pub struct BatchTranslator {
    /// The translation service to use
    service: TranslationService,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(service: TranslationService) -> Self {
        Self { service }
    }

    /// Translate every batch in order.
    ///
    /// Returns one translated block per source text across all batches, in
    /// the original text order. `progress_callback` receives
    /// `(completed_batches, total_batches)` after each batch.
    pub async fn translate_batches(
        &self,
        batches: &[Vec<String>],
        progress_callback: impl Fn(usize, usize),
    ) -> Result<Vec<String>, TranslationError> {
        let total_texts: usize = batches.iter().map(|batch| batch.len()).sum();
        let total_batches = batches.len();
        let mut all_translated = Vec::with_capacity(total_texts);

        for (batch_idx, batch) in batches.iter().enumerate() {
            debug!(
                "Processing batch {} of {} ({} entries)",
                batch_idx + 1,
                total_batches,
                batch.len()
            );

            let translated = self.service.translate_batch(batch).await?;
            all_translated.extend(translated);

            progress_callback(batch_idx + 1, total_batches);
        }

        info!(
            "Translated {} entries across {} batches",
            all_translated.len(),
            total_batches
        );

        Ok(all_translated)
    }
}
