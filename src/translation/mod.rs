/*!
 * Translation service for subtitle translation using the Gemini backend.
 *
 * This module contains the adapter between parsed subtitle text and the
 * translation backend. It is split into two submodules:
 *
 * - `core`: Service definition, output validation and retry policy
 * - `batch`: Sequential processing of the ordered batch list
 */

// Re-export main types for easier usage
pub use self::batch::BatchTranslator;
pub use self::core::TranslationService;

// Submodules
pub mod batch;
pub mod core;
