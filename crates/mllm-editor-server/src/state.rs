use crate::settings::AppConfig;
use mllm_editor_core::OpenAICompatClient;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub model: OpenAICompatClient,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let model = OpenAICompatClient::new(
            &config.upstream_url,
            &config.api_key,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )?;
        tracing::info!(
            "Model server configured at {} (model {})",
            config.upstream_url,
            config.model
        );

        Ok(Self { model })
    }
}
