//! Database connection pool and migration management.
//!
//! One pool is created at startup and shared by every request. Each query
//! checks a connection out for its own duration; the connection returns to the
//! pool when the guard is dropped, on success and on error alike.

use sqlx::{MySql, Pool, mysql::MySqlPoolOptions};

/// Type alias for the MariaDB/MySQL connection pool.
pub type DbPool = Pool<MySql>;

/// Create the process-wide connection pool.
///
/// # Arguments
///
/// * `database_url` - MariaDB/MySQL connection string
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the server cannot
/// be reached.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Applied migrations are tracked in `_sqlx_migrations`, so each file runs
/// only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro embeds ./migrations at compile time
    sqlx::migrate!("./migrations").run(pool).await
}
