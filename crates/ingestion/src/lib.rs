//! Media Catalog Ingestion Pipeline
//!
//! This crate implements the scheduled content ingestion pipeline for the
//! media catalog platform. Every day it pulls movie, TV, and televised
//! sport-event metadata from the external providers, filters and
//! deduplicates the results, and persists normalized records with their
//! genre tags.
//!
//! The pipeline runs the three sources in a fixed order (movie, sport, TV)
//! and isolates them from each other: one source failing never prevents the
//! remaining sources from running.

pub mod config;
pub mod fetch;
pub mod language;
pub mod orchestrator;
pub mod pipeline;
pub mod provider;
pub mod repository;
pub mod vocabulary;

// Re-export main types
pub use config::{ProviderConfig, ScheduleConfig};
pub use fetch::{FetchWindow, PagedFetcher, WindowedFetcher, PAGE_CAP};
pub use orchestrator::{IngestionOrchestrator, RunStats};
pub use pipeline::{IngestionPipeline, RunReport, SourceOutcome};
pub use provider::{
    CatalogListing, GenreEntry, SearchKind, SearchPage, SportEvent, SportsDbClient, TmdbClient,
};
pub use repository::{ContentRepository, PostgresContentRepository};
pub use vocabulary::{TagVocabulary, VocabularyCache};

/// Common error type for the ingestion pipeline
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IngestionError {
    /// True when the provider answered with HTTP 429.
    ///
    /// This is the only signal the pipeline retries on; every other failure
    /// is considered terminal for the operation that hit it.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, IngestionError::RateLimitExceeded { .. })
    }
}

pub type Result<T> = std::result::Result<T, IngestionError>;
pub type Error = IngestionError;
