//! Configuration for citation resolution and metadata inference

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the citation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationConfig {
    /// Maximum time for the citation call (milliseconds)
    pub call_timeout_ms: u64,

    /// Output token bound
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl CitationConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_call(self.call_timeout_ms, self.max_output_tokens, self.temperature)
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

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 60_000,
            max_output_tokens: 500,
            temperature: 0.1,
        }
    }
}

/// Configuration for inferring metadata from the document text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Maximum time for the inference call (milliseconds)
    pub call_timeout_ms: u64,

    /// Leading chars of the document shown to the oracle
    pub sample_chars: usize,

    /// Output token bound
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl InferenceConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_chars == 0 {
            return Err("sample_chars must be greater than 0".to_string());
        }
        validate_call(self.call_timeout_ms, self.max_output_tokens, self.temperature)
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 60_000,
            sample_chars: 10_000,
            max_output_tokens: 1_000,
            temperature: 0.3,
        }
    }
}

fn validate_call(call_timeout_ms: u64, max_output_tokens: u32, temperature: f32) -> Result<(), String> {
    if call_timeout_ms == 0 {
        return Err("call_timeout_ms must be greater than 0".to_string());
    }
    if max_output_tokens == 0 {
        return Err("max_output_tokens must be greater than 0".to_string());
    }
    if !(0.0..=2.0).contains(&temperature) {
        return Err(format!("temperature {} out of range [0.0, 2.0]", temperature));
    }
    Ok(())
}
