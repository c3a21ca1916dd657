use anyhow::Result;
use globalbot_api::{build_router, build_state, spawn_session_sweeper, ApiConfig};
use globalbot_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("globalbot_api");

    let config = ApiConfig::from_env();
    let state = build_state(&config)?;
    let _sweeper = spawn_session_sweeper(
        state.assistant.clone(),
        config.sweep_interval(),
        config.session_idle(),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        catalog = ?config.catalog_path,
        session_idle_secs = config.session_idle().num_seconds(),
        "globalbot api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
