use anyhow::Context;
use db::TABLES;
use server::{AppState, open_store, routes};
use services::services::{config::Config, database_validator::DatabaseValidator};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    utils::log::init();

    let config = Config::from_env().context("failed to load configuration")?;
    let store = open_store(&config)
        .await
        .context("failed to open table store")?;

    let validation = DatabaseValidator::new(store.clone()).validate(TABLES).await;
    if validation.is_ok() {
        info!("{}", validation.summary());
    } else {
        warn!("{}", validation.summary());
    }

    let state = AppState::new(store);
    let failures = state.studio.load().await;
    if failures > 0 {
        warn!(failures, "Some tables failed to load; they will retry on next request");
    }

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Studio server listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Unable to install ctrl+c handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
