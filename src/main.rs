mod config;
mod db;
mod logging;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use config::{Config, StorageBackend};
use sqlx::PgPool;
use state::AppState;
use store::memory::MemoryStore;
use store::postgres::PgStore;

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {e}");
            std::process::exit(1);
        }
    };

    logging::init(config.env);
    tracing::info!(env = ?config.env, "starting bookshelf");

    let (state, pool) = match build_state(&config).await {
        Ok(built) => built,
        Err(e) => {
            tracing::error!(error = %e, "database init failed");
            std::process::exit(1);
        }
    };

    let app = routes::app(state, config.http_server.timeout());
    let listener = match tokio::net::TcpListener::bind(&config.http_server.address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, address = %config.http_server.address, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(address = %config.http_server.address, "bookshelf listening");
    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        tracing::error!(error = %e, "server failed");
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("server stopped");
}

/// Build services over the configured backend. The pool is returned so it
/// can be closed after shutdown.
async fn build_state(config: &Config) -> Result<(AppState, Option<PgPool>), db::DbInitError> {
    match config.database.backend {
        StorageBackend::Postgres => {
            let pool = db::init_pool(&config.database).await?;
            let state = AppState::new(Arc::new(PgStore::new(pool.clone())), &config.auth);
            Ok((state, Some(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Ok((AppState::new(Arc::new(MemoryStore::new()), &config.auth), None))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutting down");
}
