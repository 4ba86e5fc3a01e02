/*!
 * Error types for the vttranslate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the Gemini API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether a failed call is worth retrying.
    ///
    /// Transport failures, rate limits and server-side errors are transient;
    /// authentication failures and malformed requests or responses are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code == 429 || *status_code >= 500,
            Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

/// Errors raised while parsing a WebVTT document
#[derive(Error, Debug)]
pub enum FormatError {
    /// The file does not start with the mandatory WEBVTT signature
    #[error("not a WebVTT file: missing WEBVTT signature on the first line")]
    MissingSignature,

    /// A cue block's timing line does not match `start --> end [settings]`
    #[error("cue block {block}: invalid timing line: {line:?}")]
    InvalidTimingLine {
        /// 1-based cue block number
        block: usize,
        /// The offending line, empty if the block ended early
        line: String,
    },

    /// A cue ends before it starts
    #[error("cue block {block}: start time {start} is not before end time {end}")]
    InvalidTimeRange {
        /// 1-based cue block number
        block: usize,
        /// Start timestamp as written in the source
        start: String,
        /// End timestamp as written in the source
        end: String,
    },

    /// A cue block has a timing line but no text lines
    #[error("cue block {block}: no text lines after the timing line")]
    MissingText {
        /// 1-based cue block number
        block: usize,
    },
}

/// Errors in the application configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API key could be resolved from the config file, environment or ~/.env
    #[error("Gemini API key is required; set it in the config file, the GEMINI_API_KEY environment variable, or ~/.env")]
    MissingApiKey,

    /// The configured batch size is unusable
    #[error("batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),

    /// A language code is not a valid ISO 639 code
    #[error("invalid language code: {0}")]
    InvalidLanguage(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The backend returned a different number of texts than it was given
    #[error("backend returned {actual} translations for {expected} source texts")]
    CountMismatch {
        /// Number of source texts sent
        expected: usize,
        /// Number of translations received
        actual: usize,
    },

    /// A transient failure persisted through every retry
    #[error("translation failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Total attempts made, including the first
        attempts: u32,
        /// The error from the final attempt
        last_error: String,
    },
}

/// Internal invariant violations during reassembly
#[derive(Error, Debug)]
pub enum SerializationError {
    /// The translated text count does not match the cue count
    #[error("translated text count {translations} does not match cue count {cues}")]
    CountMismatch {
        /// Number of cues in the document
        cues: usize,
        /// Number of translated texts supplied
        translations: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from WebVTT parsing
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Error from the configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from reassembly
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
