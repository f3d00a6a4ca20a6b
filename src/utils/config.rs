//! Configuration for the orchestration engine.
//!
//! Everything the loops consume at runtime is captured here as explicit
//! config objects handed into constructors; there are no process-wide
//! model or client singletons. API keys come from the environment
//! (`OPENAI_API_KEY`, `TAVILY_API_KEY`), optionally via a `.env` file.

use crate::types::{AppError, Result};
use serde::Deserialize;
use std::path::Path;

/// Iteration and concurrency ceilings for the two loops.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum number of supervisor decision rounds before termination is
    /// forced.
    pub max_supervisor_iterations: usize,
    /// Maximum number of decide/act steps inside one research unit.
    pub max_researcher_steps: usize,
    /// Concurrency ceiling communicated to the supervisor's decision model.
    ///
    /// Advisory only: the model is instructed not to delegate more than this
    /// many topics per round, but dispatch does not enforce it mechanically.
    pub max_concurrent_units: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_supervisor_iterations: 6,
            max_researcher_steps: 6,
            max_concurrent_units: 3,
        }
    }
}

/// Model selection per logical role.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// API key. Falls back to `OPENAI_API_KEY` when empty.
    pub api_key: String,
    /// API base URL (OpenAI-compatible endpoints are supported).
    pub api_base: String,
    /// Model used by the supervisor and research-unit decision loops.
    pub decision: String,
    /// Model used to compress a research unit's findings.
    pub synthesis: String,
    /// Model used to write the final report.
    pub report: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
            decision: "gpt-4.1".to_string(),
            synthesis: "gpt-4.1".to_string(),
            report: "gpt-4.1".to_string(),
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Tavily API key. Falls back to `TAVILY_API_KEY` when empty.
    pub api_key: String,
    /// Default number of results per query when the model does not ask for a
    /// specific count.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            max_results: 3,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Loop ceilings.
    pub limits: LimitsConfig,
    /// Model handles per role.
    pub models: ModelsConfig,
    /// Search provider settings.
    pub search: SearchConfig,
}

impl ScoutConfig {
    /// Parse configuration from a TOML string. Missing sections fall back to
    /// defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| AppError::Configuration(format!("invalid TOML: {}", e)))
    }

    /// Load configuration from a TOML file and resolve secrets from the
    /// environment (reading a `.env` file if present).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Configuration(format!(
                "failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        config.resolve_env();
        Ok(config)
    }

    /// Fill empty API keys from the environment.
    pub fn resolve_env(&mut self) {
        let _ = dotenvy::dotenv();
        if self.models.api_key.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                self.models.api_key = key;
            }
        }
        if self.search.api_key.is_empty() {
            if let Ok(key) = std::env::var("TAVILY_API_KEY") {
                self.search.api_key = key;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = ScoutConfig::default();
        assert_eq!(config.limits.max_supervisor_iterations, 6);
        assert_eq!(config.limits.max_researcher_steps, 6);
        assert_eq!(config.limits.max_concurrent_units, 3);
    }

    #[test]
    fn test_from_toml_partial_sections() {
        let config = ScoutConfig::from_toml_str(
            r#"
            [limits]
            max_supervisor_iterations = 10

            [models]
            decision = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.limits.max_supervisor_iterations, 10);
        // Unspecified fields keep defaults
        assert_eq!(config.limits.max_concurrent_units, 3);
        assert_eq!(config.models.decision, "gpt-4o-mini");
        assert_eq!(config.models.report, "gpt-4.1");
    }

    #[test]
    fn test_invalid_toml_is_a_configuration_error() {
        let err = ScoutConfig::from_toml_str("limits = ][").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
