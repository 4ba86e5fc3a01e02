/*!
 * # vttranslate - WebVTT subtitle translation with Gemini AI
 *
 * A Rust library for translating WebVTT subtitle files between languages
 * using the Google Gemini API, by default from English to Korean.
 *
 * ## Features
 *
 * - Parse WebVTT cue blocks with exact timestamp preservation
 * - Batch cue text for efficient API usage
 * - Reassemble translated text onto the original cue structure
 * - Bounded retry with backoff for transient API failures
 * - Single-file and folder processing modes
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: WebVTT parsing, batching and serialization
 * - `translation`: Translation adapter over the backend:
 *   - `translation::core`: Output validation and retry policy
 *   - `translation::batch`: Sequential batch processing
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Translation backends:
 *   - `providers::gemini`: Google Gemini API client
 *   - `providers::mock`: Deterministic stubs for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{
    AppError, ConfigError, FormatError, ProviderError, SerializationError, TranslationError,
};
pub use subtitle_processor::{VttCue, VttDocument, VttTimestamp};
pub use translation::{BatchTranslator, TranslationService};
