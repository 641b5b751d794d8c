//! Database connection pool management
//!
//! Connection pooling via SQLx with MySQL, with timeouts taken from the
//! shared database configuration.

use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use sentra_core::errors::DomainError;
use sentra_shared::config::DatabaseConfig;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
    config: DatabaseConfig,
}

impl DatabasePool {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `config` - Database configuration settings
    pub async fn new(config: DatabaseConfig) -> Result<Self, DomainError> {
        tracing::info!(
            max_connections = config.max_connections,
            "creating database connection pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("failed to connect to database: {e}"),
            })?;

        Ok(Self { pool, config })
    }

    /// The underlying SQLx pool
    pub fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    /// Per-statement timeout from the configuration
    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.config.statement_timeout)
    }

    /// Verify the database is reachable
    pub async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::Storage {
                message: format!("database health check failed: {e}"),
            })
    }
}
