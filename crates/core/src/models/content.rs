//! Content models for the media catalog platform
//!
//! Core data structures for catalog records produced by ingestion and read by
//! every other service.

use serde::{Deserialize, Serialize};

/// Origin of a catalog record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Movie,
    Tv,
    Sport,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Movie => "movie",
            SourceType::Tv => "tv",
            SourceType::Sport => "sport",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog record in the shape ingestion persists it
///
/// The external id is the dedup key, unique per source type. Viewer and rating
/// counters belong to downstream engagement tracking; ingestion always writes
/// them as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub source_type: SourceType,
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub view_count: i64,
    pub rating_count: i64,
}

impl ContentRecord {
    /// Create a record with zeroed counters and empty optional fields
    pub fn new(
        source_type: SourceType,
        external_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            source_type,
            external_id: external_id.into(),
            title: title.into(),
            description: None,
            thumbnail_url: None,
            view_count: 0,
            rating_count: 0,
        }
    }
}

/// A tag attached to a content record
///
/// Genre-backed tags keep the provider's genre id; `name` stays empty when the
/// vocabulary does not know the id. Name-only tags (no genre id) carry labels
/// like a sport discipline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTag {
    pub genre_id: Option<i64>,
    pub name: Option<String>,
}

impl ContentTag {
    /// Tag backed by a provider genre id, with the name the vocabulary
    /// resolved (or `None` when the id is unknown to it)
    pub fn genre(genre_id: i64, name: Option<String>) -> Self {
        Self {
            genre_id: Some(genre_id),
            name,
        }
    }

    /// Free-form named tag without a provider genre id
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            genre_id: None,
            name: Some(name.into()),
        }
    }
}
