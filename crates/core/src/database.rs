//! Shared PostgreSQL connection pool for media catalog services

use crate::config::{ConfigLoader, DatabaseConfig};
use crate::error::MediaCatalogError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Shared database connection pool
#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Create a new pool from the given configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self, MediaCatalogError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(Some(config.idle_timeout))
            .acquire_timeout(config.connect_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| MediaCatalogError::DatabaseError {
                message: format!("Failed to connect: {}", e),
                operation: Some("connect".to_string()),
            })?;

        info!("Database connection pool established");
        Ok(Self { pool })
    }

    /// Create a pool from environment configuration
    pub async fn from_env() -> Result<Self, MediaCatalogError> {
        let config = DatabaseConfig::from_env()?;
        config.validate()?;
        Self::new(&config).await
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the pool can still reach the database
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}
