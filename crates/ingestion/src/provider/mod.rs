//! External provider clients and their response types
//!
//! Provider payloads are parsed leniently: a field the provider omits or
//! nulls out becomes `None` rather than a parse failure, and the admission
//! rules downstream decide what to do with incomplete listings.

use serde_json::Value;

pub mod sportsdb;
pub mod tmdb;

pub use sportsdb::SportsDbClient;
pub use tmdb::TmdbClient;

/// Which catalog search endpoint a paged fetch runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Movie,
    Tv,
}

impl SearchKind {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            SearchKind::Movie => "movie",
            SearchKind::Tv => "tv",
        }
    }
}

/// One page of catalog search results
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<CatalogListing>,
}

/// A single movie or TV listing as the catalog provider returned it
#[derive(Debug, Clone)]
pub struct CatalogListing {
    pub external_id: Option<String>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub rating: Option<f32>,
    pub genre_ids: Vec<i64>,
}

/// A televised sport event as the sport provider returned it
#[derive(Debug, Clone)]
pub struct SportEvent {
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub sport: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    /// Raw `YYYY-MM-DD` date string; the windowed fetcher parses it.
    pub event_date: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// One entry of a provider genre vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreEntry {
    pub id: i64,
    pub name: String,
}

pub(crate) fn extract_string(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

pub(crate) fn extract_i64(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(|v| v.as_i64())
}

pub(crate) fn extract_u32(value: &Value, key: &str) -> Option<u32> {
    value.get(key).and_then(|v| v.as_u64()).map(|v| v as u32)
}

pub(crate) fn extract_f64(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(|v| v.as_f64())
}

pub(crate) fn extract_array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key).and_then(|v| v.as_array())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_string() {
        let value = json!({"title": "기생충", "id": 42});
        assert_eq!(extract_string(&value, "title"), Some("기생충".to_string()));
        assert_eq!(extract_string(&value, "id"), None);
        assert_eq!(extract_string(&value, "missing"), None);
    }

    #[test]
    fn test_extract_string_null_is_none() {
        let value = json!({"overview": null});
        assert_eq!(extract_string(&value, "overview"), None);
    }

    #[test]
    fn test_extract_numbers() {
        let value = json!({"id": 7, "page": 3, "vote_average": 8.5});
        assert_eq!(extract_i64(&value, "id"), Some(7));
        assert_eq!(extract_u32(&value, "page"), Some(3));
        assert_eq!(extract_f64(&value, "vote_average"), Some(8.5));
        assert_eq!(extract_i64(&value, "vote_average"), None);
    }

    #[test]
    fn test_extract_array() {
        let value = json!({"genre_ids": [18, 53], "title": "x"});
        assert_eq!(extract_array(&value, "genre_ids").map(|a| a.len()), Some(2));
        assert_eq!(extract_array(&value, "title"), None);
    }

    #[test]
    fn test_search_kind_path_segment() {
        assert_eq!(SearchKind::Movie.path_segment(), "movie");
        assert_eq!(SearchKind::Tv.path_segment(), "tv");
    }
}
