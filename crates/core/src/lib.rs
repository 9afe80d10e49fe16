//! # Media Catalog Core
//!
//! Shared building blocks for the media catalog platform.
//!
//! This crate provides the pieces every catalog service leans on: domain
//! models, error types, configuration loading, database pooling, and retry
//! with exponential backoff.
//!
//! ## Modules
//!
//! - `models`: Domain models for catalog content
//! - `error`: Error types and handling
//! - `config`: Configuration loading and validation
//! - `database`: Shared PostgreSQL connection pool
//! - `retry`: Exponential backoff retry utilities

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod retry;

// Re-export commonly used types
pub use config::{load_dotenv, parse_env_var, ConfigLoader, DatabaseConfig, ServiceConfig};
pub use database::{DatabasePool, PoolStats};
pub use error::MediaCatalogError;
pub use models::{ContentRecord, ContentTag, SourceType};
pub use retry::{retry_with_backoff, RetryPolicy};

/// Result type alias for media catalog operations
pub type Result<T> = std::result::Result<T, MediaCatalogError>;
