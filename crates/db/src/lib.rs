//! Data layer: sqlx models, repositories, and the resilient access
//! wrapper that shields page rendering from transient database failures.

pub mod fallback;
pub mod models;
pub mod repositories;
pub mod resilient;
pub mod seed;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub use resilient::{DataAccess, DataError, Fetched, RetryPolicy};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
///
/// Connects lazily: the first real query establishes the connection, so
/// startup never blocks on (or crashes from) an unreachable database.
pub fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)
}

/// Probe the database with a bounded `SELECT 1`.
pub async fn health_check(pool: &DbPool, timeout: Duration) -> Result<(), sqlx::Error> {
    match tokio::time::timeout(timeout, sqlx::query("SELECT 1").execute(pool)).await {
        Ok(result) => result.map(|_| ()),
        Err(_) => Err(sqlx::Error::PoolTimedOut),
    }
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Superficially validate a database connection URL before first use.
///
/// Checks scheme, credentials, host (with an optional numeric port), and
/// database name. This catches the common misconfigurations (truncated
/// env vars, missing password, stray whitespace) without attempting a
/// connection; callers log the returned diagnostic but may still attempt
/// the operation.
pub fn validate_database_url(url: &str) -> Result<(), String> {
    let rest = url
        .strip_prefix("postgresql://")
        .or_else(|| url.strip_prefix("postgres://"))
        .ok_or_else(|| "URL scheme must be postgres:// or postgresql://".to_string())?;

    let (credentials, host_part) = rest
        .split_once('@')
        .ok_or_else(|| "URL is missing credentials before '@'".to_string())?;

    let user = credentials.split(':').next().unwrap_or("");
    if user.is_empty() {
        return Err("URL is missing a username".to_string());
    }

    let (host_port, db_name) = host_part
        .split_once('/')
        .ok_or_else(|| "URL is missing a database name".to_string())?;

    let (host, port) = match host_port.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (host_port, None),
    };
    if host.is_empty() {
        return Err("URL is missing a host".to_string());
    }
    if let Some(port) = port {
        if port.parse::<u16>().is_err() {
            return Err(format!("URL port '{port}' is not a valid port number"));
        }
    }

    // Query parameters (sslmode etc.) are allowed after the name.
    let db_name = db_name.split('?').next().unwrap_or("");
    if db_name.is_empty() {
        return Err("URL is missing a database name".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_urls() {
        assert!(validate_database_url("postgres://user:pw@db.example.com:5432/archive").is_ok());
        assert!(validate_database_url("postgresql://user:pw@localhost/archive?sslmode=require").is_ok());
        // Password is optional in some managed setups.
        assert!(validate_database_url("postgres://user@localhost:5432/archive").is_ok());
    }

    #[test]
    fn rejects_wrong_scheme() {
        assert!(validate_database_url("mysql://user:pw@localhost/archive").is_err());
        assert!(validate_database_url("db.example.com:5432/archive").is_err());
    }

    #[test]
    fn rejects_missing_pieces() {
        assert!(validate_database_url("postgres://user:pw@localhost").is_err());
        assert!(validate_database_url("postgres://user:pw@/archive").is_err());
        assert!(validate_database_url("postgres://:pw@localhost/archive").is_err());
        assert!(validate_database_url("postgres://localhost/archive").is_err());
    }

    #[test]
    fn rejects_bad_port() {
        assert!(validate_database_url("postgres://user:pw@localhost:fivefour/archive").is_err());
    }
}
