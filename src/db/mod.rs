//! Database initialization and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses this module to create the shared SQLx pool and enforce schema
//! migrations before accepting API traffic.

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

use crate::config::DatabaseConfig;

#[derive(Debug, thiserror::Error)]
pub enum DbInitError {
    #[error("invalid ssl_mode: {0}")]
    SslMode(String),
    #[error("database error: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Build connection options from typed config.
///
/// # Errors
///
/// Returns an error if `ssl_mode` is not a recognised libpq mode.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DbInitError> {
    let ssl_mode: PgSslMode = config
        .ssl_mode
        .parse()
        .map_err(|_| DbInitError::SslMode(config.ssl_mode.clone()))?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .password(&config.password)
        .database(&config.db_name)
        .ssl_mode(ssl_mode))
}

/// Initialize the `PostgreSQL` connection pool and run migrations.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool, DbInitError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options(config)?)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
