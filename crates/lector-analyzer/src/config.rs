//! Configuration for the ChunkAnalyzer

use lector_domain::Language;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for segmenting and analysing a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum segment size (characters)
    pub max_segment_chars: usize,

    /// Maximum time for a single analysis call (milliseconds)
    pub call_timeout_ms: u64,

    /// Minimum pause between consecutive analysis calls (milliseconds)
    pub inter_call_delay_ms: u64,

    /// Output token bound per analysis
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Language the oracle writes field values in
    pub language: Language,
}

impl AnalyzerConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Get the inter-call delay as a Duration
    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_segment_chars == 0 {
            return Err("max_segment_chars must be greater than 0".to_string());
        }
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

    /// Local preset: no inter-call delay, for self-hosted models without rate limits
    pub fn local() -> Self {
        Self {
            inter_call_delay_ms: 0,
            call_timeout_ms: 300_000,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_segment_chars: 12_000,
            call_timeout_ms: 120_000,
            inter_call_delay_ms: 1_000,
            max_output_tokens: 2_000,
            temperature: 0.2,
            language: Language::English,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.inter_call_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_local_config_is_valid() {
        let config = AnalyzerConfig::local();
        assert!(config.validate().is_ok());
        assert!(config.inter_call_delay().is_zero());
    }

    #[test]
    fn test_invalid_segment_size() {
        let mut config = AnalyzerConfig::default();
        config.max_segment_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature() {
        let mut config = AnalyzerConfig::default();
        config.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AnalyzerConfig::from_toml("max_segment_chars = 500\nlanguage = \"portuguese\"").unwrap();
        assert_eq!(config.max_segment_chars, 500);
        assert_eq!(config.language, Language::Portuguese);
        assert_eq!(config.inter_call_delay_ms, 1_000);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalyzerConfig::local();
        let toml_str = config.to_toml().unwrap();
        let parsed = AnalyzerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
