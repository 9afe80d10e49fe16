//! TMDB catalog client
//!
//! Covers the two endpoint families the pipeline needs: paged movie/TV
//! search and the per-kind genre vocabulary list.

use crate::provider::{
    extract_array, extract_f64, extract_i64, extract_string, extract_u32, CatalogListing,
    GenreEntry, SearchKind, SearchPage,
};
use crate::{IngestionError, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Poster paths come back relative; this CDN prefix turns them into URLs.
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

const PROVIDER_NAME: &str = "tmdb";

/// Client for the TMDB REST API
pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    /// Create a client against the production API
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a specific base URL
    ///
    /// Integration tests point this at a local mock server.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Fetch one page of search results for a query
    ///
    /// HTTP 429 maps to [`IngestionError::RateLimitExceeded`]; any other
    /// non-success status is an [`IngestionError::HttpError`]. A response
    /// without a `results` array parses as an empty page.
    pub async fn search_page(&self, kind: SearchKind, query: &str, page: u32) -> Result<SearchPage> {
        let url = format!(
            "{}/search/{}?api_key={}&query={}&page={}",
            self.base_url,
            kind.path_segment(),
            self.api_key,
            urlencoding::encode(query),
            page
        );

        debug!(kind = ?kind, page = page, "Fetching search page");
        let body = self.get_json(&url).await?;
        Ok(parse_search_page(&body, page))
    }

    /// Fetch the genre vocabulary for movie or TV
    pub async fn genre_list(&self, kind: SearchKind) -> Result<Vec<GenreEntry>> {
        let url = format!(
            "{}/genre/{}/list?api_key={}",
            self.base_url,
            kind.path_segment(),
            self.api_key
        );

        debug!(kind = ?kind, "Fetching genre list");
        let body = self.get_json(&url).await?;
        Ok(parse_genre_list(&body))
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(IngestionError::RateLimitExceeded {
                provider: PROVIDER_NAME.to_string(),
            });
        }
        let response = response.error_for_status()?;
        Ok(response.json().await?)
    }
}

fn parse_search_page(body: &Value, requested_page: u32) -> SearchPage {
    let results = extract_array(body, "results")
        .map(|items| items.iter().map(parse_listing).collect())
        .unwrap_or_default();

    SearchPage {
        page: extract_u32(body, "page").unwrap_or(requested_page),
        total_pages: extract_u32(body, "total_pages").unwrap_or(1),
        total_results: extract_u32(body, "total_results").unwrap_or(0),
        results,
    }
}

fn parse_listing(item: &Value) -> CatalogListing {
    CatalogListing {
        external_id: extract_i64(item, "id").map(|id| id.to_string()),
        // Movies carry "title", TV series carry "name"
        title: extract_string(item, "title").or_else(|| extract_string(item, "name")),
        overview: extract_string(item, "overview"),
        poster_url: extract_string(item, "poster_path")
            .map(|path| format!("{}{}", POSTER_BASE_URL, path)),
        rating: extract_f64(item, "vote_average").map(|v| v as f32),
        genre_ids: extract_array(item, "genre_ids")
            .map(|ids| ids.iter().filter_map(|v| v.as_i64()).collect())
            .unwrap_or_default(),
    }
}

fn parse_genre_list(body: &Value) -> Vec<GenreEntry> {
    extract_array(body, "genres")
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let id = extract_i64(entry, "id")?;
                    let name = extract_string(entry, "name")?;
                    Some(GenreEntry { id, name })
                })
                .collect()
        })
        .unwrap_or_default()
}
