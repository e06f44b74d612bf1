//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use lector_llm::{OpenAiProvider, MAX_ATTEMPTS_LIMIT};
use lector_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Oracle endpoint
    #[serde(default)]
    pub llm: LlmSettings,

    /// Pipeline stages
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API base URL
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// HTTP timeout per request, in seconds
    pub request_timeout_secs: u64,

    /// Attempts per completion, including the first
    pub max_attempts: u32,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".lector").join("config.toml"))
    }

    /// Load configuration from `path`, or the default path, falling back to defaults
    /// when the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::path()?,
        };

        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        debug!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        config.llm.validate()?;
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Build the oracle provider described by `[llm]`.
    pub fn build_provider(&self) -> Result<OpenAiProvider> {
        let llm = &self.llm;
        let provider = OpenAiProvider::from_env(&llm.base_url, &llm.model, &llm.api_key_env)?
            .with_max_attempts(llm.max_attempts)
            .with_request_timeout(Duration::from_secs(llm.request_timeout_secs))?;
        Ok(provider)
    }
}

impl LlmSettings {
    /// Reject values the provider would otherwise clamp silently.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_ATTEMPTS_LIMIT).contains(&self.max_attempts) {
            return Err(CliError::Config(format!(
                "llm.max_attempts must be between 1 and {}, got {}",
                MAX_ATTEMPTS_LIMIT, self.max_attempts
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CliError::Config(
                "llm.request_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            request_timeout_secs: 300,
            max_attempts: 3,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

#[cfg(test)]
mod tests {
    use super::*;
    use lector_domain::Language;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();

        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.settings.format, OutputFormat::Text);
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[llm]
base_url = "http://localhost:11434/v1"
model = "llama3"

[pipeline.synthesizer]
language = "portuguese"

[settings]
format = "json"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.max_attempts, 3);
        assert_eq!(config.pipeline.synthesizer.language, Language::Portuguese);
        assert_eq!(config.pipeline.min_text_chars, 100);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
    }

    #[test]
    fn test_invalid_pipeline_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[pipeline.analyzer]\nmax_segment_chars = 0\n").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(CliError::Pipeline(_))));
    }

    #[test]
    fn test_out_of_range_attempts_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        for attempts in [0, 65, 1000] {
            fs::write(&path, format!("[llm]\nmax_attempts = {}\n", attempts)).unwrap();
            let result = Config::load(Some(&path));
            assert!(matches!(result, Err(CliError::Config(_))), "{} accepted", attempts);
        }

        fs::write(&path, "[llm]\nmax_attempts = 10\n").unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().llm.max_attempts, 10);
    }

    #[test]
    fn test_written_defaults_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.llm.model = "local-model".to_string();
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.llm.model, "local-model");
    }

    #[test]
    fn test_local_endpoint_needs_no_key() {
        let mut config = Config::default();
        config.llm.base_url = "http://localhost:11434/v1".to_string();
        config.llm.api_key_env = "LECTOR_TEST_UNSET_KEY".to_string();

        let provider = config.build_provider().unwrap();
        assert_eq!(provider.model(), "gpt-4o-mini");
    }
}
