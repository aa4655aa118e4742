//! Agent configuration
//!
//! All tunables are carried in an explicit structure handed to the
//! orchestrator at construction - no process-wide mutable state.

use std::env;

pub const DEFAULT_MODEL: &str = "llama3.1";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Low temperature keeps the reasoning steps close to deterministic.
pub const MODEL_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Ollama model name (e.g. 'llama3.1', 'mistral', 'mixtral')
    pub model: String,
    /// Ollama API base URL
    pub ollama_url: String,
    /// Optional bearer credential for cloud-hosted models
    pub api_key: Option<String>,
    /// Hard cap on reasoning loop iterations
    pub max_iterations: u32,
    /// Per-request timeout for model calls, in seconds
    pub request_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            api_key: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            request_timeout_secs: 60,
        }
    }
}

impl AgentConfig {
    /// Build a configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `OLLAMA_MODEL`, `OLLAMA_URL`, `OLLAMA_API_KEY`,
    /// `MAX_ITERATIONS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_iterations = env::var("MAX_ITERATIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.max_iterations);

        Self {
            model: env::var("OLLAMA_MODEL").unwrap_or(defaults.model),
            ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            api_key: env::var("OLLAMA_API_KEY").ok().filter(|k| !k.is_empty()),
            max_iterations,
            request_timeout_secs: defaults.request_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AgentConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_iterations, 10);
        assert!(config.api_key.is_none());
    }
}
