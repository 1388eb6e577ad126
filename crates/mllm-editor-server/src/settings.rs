use mllm_editor_core::ai::openai::{DEFAULT_API_KEY, DEFAULT_MODEL, DEFAULT_UPSTREAM_URL};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl AppConfig {
    /// Read `MLLM_*` variables (`MLLM_PORT`, `MLLM_UPSTREAM_URL`, ...)
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("MLLM"))
    }

    fn from_source(env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_source(config::Environment::with_prefix("MLLM").source(Some(map))).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_vars(&[]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.upstream_url, "http://localhost:8000/v1");
        assert_eq!(config.model, "qwen3-vl");
        assert_eq!(config.api_key, "EMPTY");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_env_overrides() {
        let config = from_vars(&[
            ("MLLM_PORT", "9100"),
            ("MLLM_MODEL", "llava"),
            ("MLLM_UPSTREAM_URL", "http://gpu:8000/v1"),
        ]);
        assert_eq!(config.port, 9100);
        assert_eq!(config.model, "llava");
        assert_eq!(config.upstream_url, "http://gpu:8000/v1");
    }
}
