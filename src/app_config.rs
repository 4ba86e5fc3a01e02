use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::errors::ConfigError;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key; falls back to GEMINI_API_KEY or ~/.env when empty
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Cues per translation request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
            common: TranslationCommonConfig::default(),
        }
    }
}

/// Common translation settings independent of the backend endpoint
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
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

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ko".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_batch_size() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_system_prompt() -> String {
    "Translate the following {source_language} subtitle texts to {target_language}. \
     Keep the translations natural and appropriate for subtitles. \
     Preserve the line breaks within each entry. \
     Keep the <<ENTRY_n>> and <<END>> markers exactly as they appear and \
     return every entry, in the same order:"
        .to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if language_utils::validate_language_code(&self.source_language).is_err() {
            return Err(ConfigError::InvalidLanguage(self.source_language.clone()));
        }
        if language_utils::validate_language_code(&self.target_language).is_err() {
            return Err(ConfigError::InvalidLanguage(self.target_language.clone()));
        }

        if self.translation.batch_size < 1 {
            return Err(ConfigError::InvalidBatchSize(self.translation.batch_size));
        }

        // Fail before any translation call is made rather than on the first batch
        self.resolved_api_key()?;

        Ok(())
    }

    /// Resolve the API key: config value, then environment, then ~/.env.
    pub fn resolved_api_key(&self) -> Result<String, ConfigError> {
        let env_file = dirs::home_dir()
            .map(|home| home.join(".env"))
            .filter(|path| path.exists())
            .and_then(|path| std::fs::read_to_string(path).ok());

        resolve_api_key(
            &self.translation.api_key,
            std::env::var("GEMINI_API_KEY").ok(),
            env_file.as_deref(),
        )
        .ok_or(ConfigError::MissingApiKey)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to open config file {:?}: {}", path.as_ref(), e))?;
        let reader = std::io::BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", path.as_ref(), e))?;
        Ok(config)
    }

    /// Write the configuration to a JSON file, pretty-printed.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| anyhow::anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;
        Ok(())
    }
}

/// Pick the first non-empty API key from the explicit config value, the
/// process environment, or a dotenv-style file body.
pub fn resolve_api_key(
    explicit: &str,
    env_var: Option<String>,
    env_file: Option<&str>,
) -> Option<String> {
    if !explicit.trim().is_empty() {
        return Some(explicit.trim().to_string());
    }

    if let Some(value) = env_var {
        if !value.trim().is_empty() {
            return Some(value.trim().to_string());
        }
    }

    if let Some(content) = env_file {
        for line in content.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix("GEMINI_API_KEY=") {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
