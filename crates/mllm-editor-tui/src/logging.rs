use anyhow::Result;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// The terminal is owned by the UI, so logs go to
/// `<data dir>/mllm-chat-editor/editor.log`, filtered by `MLLM_EDITOR_LOG`.
pub fn init() -> Result<PathBuf> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mllm-chat-editor");
    std::fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("editor.log");
    let log_file = std::fs::File::create(&log_path)?;

    let filter = EnvFilter::try_from_env("MLLM_EDITOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(log_path)
}
