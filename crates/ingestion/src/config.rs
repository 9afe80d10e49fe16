//! Ingestion service configuration

use chrono::NaiveTime;
use media_catalog_core::config::{parse_env_var, ConfigLoader};
use media_catalog_core::error::MediaCatalogError;
use std::time::Duration;
use url::Url;

/// Provider connection configuration
///
/// # Environment Variables
///
/// - `MEDIA_CATALOG_TMDB_API_KEY`: catalog API key (required, falls back to `TMDB_API_KEY`)
/// - `MEDIA_CATALOG_TMDB_BASE_URL`: catalog base URL (default: `https://api.themoviedb.org/3`)
/// - `MEDIA_CATALOG_SPORTSDB_API_KEY`: sport API key (default: the shared free-tier key)
/// - `MEDIA_CATALOG_SPORTSDB_BASE_URL`: sport base URL (default: `https://www.thesportsdb.com/api/v1/json`)
/// - `MEDIA_CATALOG_PROVIDER_TIMEOUT`: per-request timeout in seconds (default: 30)
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub sportsdb_api_key: String,
    pub sportsdb_base_url: String,
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: String::new(),
            tmdb_base_url: "https://api.themoviedb.org/3".to_string(),
            sportsdb_api_key: crate::provider::sportsdb::FREE_TIER_API_KEY.to_string(),
            sportsdb_base_url: "https://www.thesportsdb.com/api/v1/json".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ConfigLoader for ProviderConfig {
    fn from_env() -> Result<Self, MediaCatalogError> {
        let defaults = Self::default();

        let tmdb_api_key = std::env::var("MEDIA_CATALOG_TMDB_API_KEY")
            .or_else(|_| std::env::var("TMDB_API_KEY"))
            .map_err(|_| MediaCatalogError::ConfigurationError {
                message: "TMDB API key is not set".to_string(),
                key: Some("MEDIA_CATALOG_TMDB_API_KEY".to_string()),
            })?;

        let timeout_secs: u64 =
            parse_env_var("MEDIA_CATALOG_PROVIDER_TIMEOUT", defaults.request_timeout.as_secs())?;

        Ok(Self {
            tmdb_api_key,
            tmdb_base_url: std::env::var("MEDIA_CATALOG_TMDB_BASE_URL")
                .unwrap_or(defaults.tmdb_base_url),
            sportsdb_api_key: std::env::var("MEDIA_CATALOG_SPORTSDB_API_KEY")
                .unwrap_or(defaults.sportsdb_api_key),
            sportsdb_base_url: std::env::var("MEDIA_CATALOG_SPORTSDB_BASE_URL")
                .unwrap_or(defaults.sportsdb_base_url),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn validate(&self) -> Result<(), MediaCatalogError> {
        if self.tmdb_api_key.trim().is_empty() {
            return Err(MediaCatalogError::ConfigurationError {
                message: "TMDB API key must not be empty".to_string(),
                key: Some("MEDIA_CATALOG_TMDB_API_KEY".to_string()),
            });
        }
        if self.sportsdb_api_key.trim().is_empty() {
            return Err(MediaCatalogError::ConfigurationError {
                message: "Sport API key must not be empty".to_string(),
                key: Some("MEDIA_CATALOG_SPORTSDB_API_KEY".to_string()),
            });
        }

        for (url, key) in [
            (&self.tmdb_base_url, "MEDIA_CATALOG_TMDB_BASE_URL"),
            (&self.sportsdb_base_url, "MEDIA_CATALOG_SPORTSDB_BASE_URL"),
        ] {
            Url::parse(url).map_err(|e| MediaCatalogError::ConfigurationError {
                message: format!("Invalid provider base URL '{}': {}", url, e),
                key: Some(key.to_string()),
            })?;
        }

        if self.request_timeout.is_zero() {
            return Err(MediaCatalogError::ConfigurationError {
                message: "Provider timeout must be greater than 0".to_string(),
                key: Some("MEDIA_CATALOG_PROVIDER_TIMEOUT".to_string()),
            });
        }

        Ok(())
    }
}

/// Pipeline schedule configuration
///
/// # Environment Variables
///
/// - `MEDIA_CATALOG_INGEST_RUN_AT`: daily run time as local `HH:MM` (default: `03:00`)
/// - `MEDIA_CATALOG_MOVIE_QUERY`: movie search query (default: `한국`)
/// - `MEDIA_CATALOG_TV_QUERY`: TV search query (default: `한국`)
/// - `MEDIA_CATALOG_SPORT_CALL_DELAY_MS`: pause between sport day queries (default: 600)
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub run_at: NaiveTime,
    pub movie_query: String,
    pub tv_query: String,
    pub sport_call_delay: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_at: NaiveTime::from_hms_opt(3, 0, 0).unwrap_or(NaiveTime::MIN),
            movie_query: "한국".to_string(),
            tv_query: "한국".to_string(),
            sport_call_delay: Duration::from_millis(600),
        }
    }
}

impl ConfigLoader for ScheduleConfig {
    fn from_env() -> Result<Self, MediaCatalogError> {
        let defaults = Self::default();

        let run_at = match std::env::var("MEDIA_CATALOG_INGEST_RUN_AT") {
            Ok(raw) => parse_run_at(&raw)?,
            Err(_) => defaults.run_at,
        };

        let delay_ms: u64 = parse_env_var(
            "MEDIA_CATALOG_SPORT_CALL_DELAY_MS",
            defaults.sport_call_delay.as_millis() as u64,
        )?;

        Ok(Self {
            run_at,
            movie_query: std::env::var("MEDIA_CATALOG_MOVIE_QUERY")
                .unwrap_or(defaults.movie_query),
            tv_query: std::env::var("MEDIA_CATALOG_TV_QUERY").unwrap_or(defaults.tv_query),
            sport_call_delay: Duration::from_millis(delay_ms),
        })
    }

    fn validate(&self) -> Result<(), MediaCatalogError> {
        if self.movie_query.trim().is_empty() {
            return Err(MediaCatalogError::ConfigurationError {
                message: "Movie search query must not be empty".to_string(),
                key: Some("MEDIA_CATALOG_MOVIE_QUERY".to_string()),
            });
        }
        if self.tv_query.trim().is_empty() {
            return Err(MediaCatalogError::ConfigurationError {
                message: "TV search query must not be empty".to_string(),
                key: Some("MEDIA_CATALOG_TV_QUERY".to_string()),
            });
        }
        Ok(())
    }
}

fn parse_run_at(raw: &str) -> Result<NaiveTime, MediaCatalogError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| MediaCatalogError::ConfigurationError {
            message: format!("Invalid run time '{}': {}", raw, e),
            key: Some("MEDIA_CATALOG_INGEST_RUN_AT".to_string()),
        })
}
