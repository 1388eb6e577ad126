use crate::transport::DEFAULT_BACKEND_URL;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `backend_url`
pub const BACKEND_URL_ENV: &str = "MLLM_BACKEND_URL";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Base for relative image sources in the composed document
    #[serde(default)]
    pub image_base_url: Option<String>,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            backend_url: default_backend_url(),
            image_base_url: None,
        }
    }

    /// Parsed `image_base_url`; an unparsable value is ignored
    pub fn image_base(&self) -> Option<Url> {
        let raw = self.image_base_url.as_deref()?;
        match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(image_base_url = raw, error = %e, "ignoring invalid image base URL");
                None
            }
        }
    }

    /// Load from the user config dir, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_or_init(&Self::get_config_path()?)?;
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                config.backend_url = url;
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Like [`Config::load_from`], but a missing file is created with defaults
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::new();
        config.save_to(path)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("mllm-chat-editor").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.backend_url, "http://localhost:9000/chat");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            backend_url: "http://10.0.0.2:9000/chat".to_string(),
            image_base_url: Some("http://10.0.0.2/".to_string()),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mllm-chat-editor").join("config.json");

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config, Config::new());
        assert!(path.exists());
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "backend_url": "http://h:1/chat" }"#).unwrap();

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config.backend_url, "http://h:1/chat");
        assert!(fs::read_to_string(&path).unwrap().contains("http://h:1/chat"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "image_base_url": "http://h/" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.image_base_url.as_deref(), Some("http://h/"));
    }

    #[test]
    fn test_image_base_parsing() {
        let mut config = Config::new();
        assert_eq!(config.image_base(), None);

        config.image_base_url = Some("http://h/assets/".to_string());
        assert_eq!(config.image_base().map(String::from).as_deref(), Some("http://h/assets/"));

        config.image_base_url = Some("not a url".to_string());
        assert_eq!(config.image_base(), None);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
