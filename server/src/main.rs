//! Profile API server: reads settings from the environment (and `.env`), prepares the store,
//! mounts every route and serves until Ctrl-C or SIGTERM.
//!
//! Run from repo root: `cargo run -p profile-server`

use profile_api::{
    app_router, ensure_database_exists, ensure_tables, AppState, Settings, StoreBackend,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter())),
        )
        .init();
    tracing::info!(app = %settings.app_name, debug = settings.debug, "starting up");

    let state = match settings.store_backend() {
        StoreBackend::Postgres(database_url) => {
            ensure_database_exists(&database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&database_url)
                .await?;
            ensure_tables(&pool).await?;
            AppState::postgres(pool, &settings.app_name)
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on exit");
            AppState::in_memory(&settings.app_name)
        }
    };

    let app = app_router(state.clone(), &settings);
    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    if let Some(pool) = state.pool {
        pool.close().await;
    }
    tracing::info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
