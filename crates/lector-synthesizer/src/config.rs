//! Configuration for the Synthesizer

use lector_domain::Language;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the synthesis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    /// Maximum time for the synthesis call (milliseconds)
    pub call_timeout_ms: u64,

    /// Output token bound for the report
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Language of the section titles and the report text
    pub language: Language,
}

impl SynthesizerConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_ms == 0 {
            return Err("call_timeout_ms must be greater than 0".to_string());
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 180_000,
            max_output_tokens: 4_000,
            temperature: 0.3,
            language: Language::English,
        }
    }
}

/// Configuration for summaries written from metadata alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Maximum time for the summary call (milliseconds)
    pub call_timeout_ms: u64,

    /// Output token bound for the summary
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Language of the summary
    pub language: Language,
}

impl SummaryConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_ms == 0 {
            return Err("call_timeout_ms must be greater than 0".to_string());
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        Ok(())
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 60_000,
            max_output_tokens: 800,
            temperature: 0.3,
            language: Language::English,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SynthesizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_output_tokens, 4_000);
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = SynthesizerConfig {
            call_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary_defaults() {
        let config = SummaryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_output_tokens, 800);
        assert_eq!(config.call_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_toml() {
        let config = SynthesizerConfig::from_toml("temperature = 0.5").unwrap();
        assert!((config.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.language, Language::English);
    }
}
