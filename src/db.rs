//! Global database pool.

use crate::app_config::DatabaseConfig;
use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connects to the database and stores the pool for `get_db_pool`.
/// Calling it again after a successful init keeps the first pool.
pub async fn init_db(config: &DatabaseConfig) -> Result<&'static DatabaseConnection, DbErr> {
    if let Some(pool) = DB_POOL.get() {
        return Ok(pool);
    }

    let pool = connect(config).await?;
    log::info!(
        "Database pool ready (max_connections = {})",
        config.max_connections
    );
    Ok(DB_POOL.get_or_init(|| pool))
}

/// Opens a standalone connection pool with the configured options.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(config.sqlx_logging);

    Database::connect(options).await
}

/// Returns the pool created by `init_db`.
///
/// # Panics
/// If `init_db` has not completed.
pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL
        .get()
        .expect("Database pool accessed before init_db was called.")
}
