use settings::AppConfig;

mod error;
mod routes;
mod settings;
mod state;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting mllm-editor backend");

    let app_state = state::AppState::new(&config)?;
    let app = routes::create_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
