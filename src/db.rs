//! SQLite connection pool setup.
//!
//! Handlers receive the pool as `web::Data<SqlitePool>`. Every query checks a
//! connection out and hands it back when the query future completes or is
//! dropped, so a failing request never holds a connection.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::AppError;

/// Schema migrations embedded from `./migrations`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Opens a pool against `database_url` and brings the schema up to date.
///
/// The database file is created when missing. Foreign keys are enforced so
/// deleting a user cascades to its tasks and API keys.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    log::info!("database ready at {}", database_url);
    Ok(pool)
}

/// A single-connection in-memory database with the schema applied.
///
/// Each in-memory SQLite connection is its own database, so the pool is
/// pinned to one connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    Ok(pool)
}
