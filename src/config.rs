use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_SUMMARY_MODEL: &str = "llama3";
const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 60;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Rusty Roster server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    pub server_port: u16,
    /// Base URL of the Ollama runtime that writes student summaries.
    pub ollama_url: String,
    /// Model identifier passed to the generation endpoint.
    pub summary_model: String,
    /// Upper bound on a single generation request, in seconds.
    pub summary_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset so that an empty `.env` entry falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let server_port = optional("SERVER_PORT")
            .map(|value| {
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
            })
            .transpose()?
            .unwrap_or(DEFAULT_SERVER_PORT);

        let summary_timeout_secs = optional("SUMMARY_TIMEOUT_SECS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ConfigError::InvalidValue("SUMMARY_TIMEOUT_SECS".into()))
            })
            .transpose()?
            .unwrap_or(DEFAULT_SUMMARY_TIMEOUT_SECS);

        Ok(Self {
            server_port,
            ollama_url: optional("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            summary_model: optional("SUMMARY_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.to_string()),
            summary_timeout_secs,
        })
    }

    /// Timeout applied to each outbound generation request.
    pub fn summary_timeout(&self) -> Duration {
        Duration::from_secs(self.summary_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            summary_timeout_secs: DEFAULT_SUMMARY_TIMEOUT_SECS,
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
///
/// Values read from a `.env` file in the working directory are honoured, but never override
/// variables already present in the process environment.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).expect("config");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.ollama_url, "http://127.0.0.1:11434");
        assert_eq!(config.summary_model, "llama3");
        assert_eq!(config.summary_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "9001"),
            ("OLLAMA_URL", "http://ollama:11434"),
            ("SUMMARY_MODEL", "llama3.1"),
            ("SUMMARY_TIMEOUT_SECS", " 5 "),
        ]))
        .expect("config");
        assert_eq!(config.server_port, 9001);
        assert_eq!(config.ollama_url, "http://ollama:11434");
        assert_eq!(config.summary_model, "llama3.1");
        assert_eq!(config.summary_timeout_secs, 5);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[("SUMMARY_MODEL", "   "), ("SERVER_PORT", "")]))
                .expect("config");
        assert_eq!(config.summary_model, "llama3");
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn rejects_unparseable_port() {
        let error = Config::from_lookup(lookup_from(&[("SERVER_PORT", "eighty")]))
            .expect_err("invalid port");
        assert!(matches!(error, ConfigError::InvalidValue(key) if key == "SERVER_PORT"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let error = Config::from_lookup(lookup_from(&[("SUMMARY_TIMEOUT_SECS", "0")]))
            .expect_err("zero timeout");
        assert!(matches!(error, ConfigError::InvalidValue(key) if key == "SUMMARY_TIMEOUT_SECS"));
    }
}
