//! Configuration management.
//!
//! Settings load from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `MERGESCOPE_PROVIDER`: capability provider (ollama|openai|anthropic|gemini|xai|groq) - **required** for `from_env`
//! - `MERGESCOPE_MODEL`: model name - default: "qwen2.5:14b"
//! - `MERGESCOPE_REQUEST_TIMEOUT`: capability call timeout in seconds - default: "60"
//! - `MERGESCOPE_SIMILARITY_THRESHOLD`: consolidation citation-set Jaccard threshold - default: "0.5"
//! - `MERGESCOPE_VENDOR_MATCH_THRESHOLD`: fuzzy vendor grouping threshold - default: "0.9"
//! - `MERGESCOPE_LOG_LEVEL`: logging level - default: "info"
//!
//! Provider credentials (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, ...) are
//! read directly by the genai library.

use crate::cost::TsaConfig;
use crate::llm::{GenAiClient, LlmClient};
use genai::adapter::AdapterKind;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MODEL: &str = "qwen2.5:14b";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;
const DEFAULT_VENDOR_MATCH_THRESHOLD: f64 = 0.9;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Provider not specified. Set MERGESCOPE_PROVIDER environment variable (ollama|openai|anthropic|gemini|xai|groq)")]
    MissingProvider,

    #[error("Invalid provider: {0}. Valid options: ollama, openai, anthropic, gemini, xai, groq")]
    InvalidProvider(String),

    #[error("Failed to parse {field}: {error}")]
    Parse { field: String, error: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct MergescopeConfig {
    /// Capability provider.
    pub provider: AdapterKind,

    /// Model name (provider-specific).
    pub model: String,

    /// Capability request timeout.
    pub request_timeout_secs: u64,

    /// Citation-set Jaccard similarity above which two findings of the
    /// same kind and domain are merged.
    pub similarity_threshold: f64,

    /// Jaro-Winkler similarity above which two vendor names land in the
    /// same overlap comparison group.
    pub vendor_match_threshold: f64,

    /// Transitional-service rates and bounds.
    pub tsa: TsaConfig,
}

impl Default for MergescopeConfig {
    fn default() -> Self {
        Self {
            provider: AdapterKind::Ollama,
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            vendor_match_threshold: DEFAULT_VENDOR_MATCH_THRESHOLD,
            tsa: TsaConfig::default(),
        }
    }
}

impl MergescopeConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider_str = env::var("MERGESCOPE_PROVIDER").map_err(|_| ConfigError::MissingProvider)?;
        let provider = parse_provider(&provider_str)?;

        let model = env::var("MERGESCOPE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let request_timeout_secs =
            parse_env("MERGESCOPE_REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let similarity_threshold =
            parse_env("MERGESCOPE_SIMILARITY_THRESHOLD", DEFAULT_SIMILARITY_THRESHOLD)?;
        let vendor_match_threshold = parse_env(
            "MERGESCOPE_VENDOR_MATCH_THRESHOLD",
            DEFAULT_VENDOR_MATCH_THRESHOLD,
        )?;

        let config = Self {
            provider,
            model,
            request_timeout_secs,
            similarity_threshold,
            vendor_match_threshold,
            tsa: TsaConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("model is empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "request timeout must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) || self.similarity_threshold == 0.0 {
            return Err(ConfigError::ValidationFailed(format!(
                "similarity threshold {} outside (0.0, 1.0]",
                self.similarity_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.vendor_match_threshold) {
            return Err(ConfigError::ValidationFailed(format!(
                "vendor match threshold {} outside [0.0, 1.0]",
                self.vendor_match_threshold
            )));
        }
        self.tsa
            .validate()
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;
        Ok(())
    }

    /// Builds the capability client this configuration describes.
    pub fn create_client(&self) -> Arc<dyn LlmClient> {
        Arc::new(GenAiClient::new(
            self.provider,
            self.model.clone(),
            Duration::from_secs(self.request_timeout_secs),
        ))
    }
}

pub fn parse_provider(s: &str) -> Result<AdapterKind, ConfigError> {
    AdapterKind::from_lower_str(&s.to_lowercase())
        .ok_or_else(|| ConfigError::InvalidProvider(s.to_string()))
}

fn parse_env<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) => value.parse().map_err(|e: T::Err| ConfigError::Parse {
            field: var.to_string(),
            error: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = MergescopeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.similarity_threshold, 0.5);
    }

    #[test]
    fn test_parse_provider() {
        assert!(parse_provider("ollama").is_ok());
        assert!(parse_provider("anthropic").is_ok());
        assert!(matches!(
            parse_provider("watson"),
            Err(ConfigError::InvalidProvider(_))
        ));
    }

    #[test]
    fn test_zero_similarity_threshold_rejected() {
        let config = MergescopeConfig {
            similarity_threshold: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = MergescopeConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
