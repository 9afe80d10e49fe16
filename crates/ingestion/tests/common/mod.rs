//! Shared fixtures for the ingestion integration tests
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use media_catalog_core::models::{ContentRecord, ContentTag, SourceType};
use media_catalog_core::retry::RetryPolicy;
use media_catalog_ingestion::provider::{SportsDbClient, TmdbClient};
use media_catalog_ingestion::repository::ContentRepository;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;
use wiremock::MockServer;

/// In-memory repository double mirroring the dedup semantics of the real
/// store: saving an existing (source, external id) pair returns the
/// existing row's id untouched.
#[derive(Default)]
pub struct InMemoryRepository {
    records: Mutex<Vec<(Uuid, ContentRecord)>>,
    tags: Mutex<Vec<(Uuid, ContentTag)>>,
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn exists_by_external_id(
        &self,
        source_type: SourceType,
        external_id: &str,
    ) -> Result<bool> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .any(|(_, r)| r.source_type == source_type && r.external_id == external_id))
    }

    async fn save(&self, record: &ContentRecord) -> Result<Uuid> {
        let mut records = self.records.lock().unwrap();
        if let Some((id, _)) = records
            .iter()
            .find(|(_, r)| r.source_type == record.source_type && r.external_id == record.external_id)
        {
            return Ok(*id);
        }
        let id = Uuid::new_v4();
        records.push((id, record.clone()));
        Ok(id)
    }

    async fn save_tag(&self, content_id: Uuid, tag: &ContentTag) -> Result<()> {
        self.tags.lock().unwrap().push((content_id, tag.clone()));
        Ok(())
    }
}

impl InMemoryRepository {
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn record(&self, source_type: SourceType, external_id: &str) -> Option<ContentRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|(_, r)| r.source_type == source_type && r.external_id == external_id)
            .map(|(_, r)| r.clone())
    }

    pub fn tags_of(&self, source_type: SourceType, external_id: &str) -> Vec<ContentTag> {
        let records = self.records.lock().unwrap();
        let Some((id, _)) = records
            .iter()
            .find(|(_, r)| r.source_type == source_type && r.external_id == external_id)
        else {
            return Vec::new();
        };
        self.tags
            .lock()
            .unwrap()
            .iter()
            .filter(|(content_id, _)| content_id == id)
            .map(|(_, tag)| tag.clone())
            .collect()
    }
}

/// Retry policy with delays short enough for tests
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(2, 10, 50, false)
}

pub fn tmdb_client(server: &MockServer) -> TmdbClient {
    TmdbClient::with_base_url("test-key", server.uri(), Duration::from_secs(5)).unwrap()
}

pub fn sportsdb_client(server: &MockServer) -> SportsDbClient {
    SportsDbClient::with_base_url("3", server.uri(), Duration::from_secs(5)).unwrap()
}

pub fn search_page_body(page: u32, total_pages: u32, results: Vec<Value>) -> Value {
    json!({
        "page": page,
        "total_pages": total_pages,
        "total_results": results.len(),
        "results": results,
    })
}

pub fn movie_item(id: i64, title: &str, overview: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": overview,
        "poster_path": format!("/poster-{}.jpg", id),
        "vote_average": 7.2,
        "genre_ids": [18],
    })
}

pub fn tv_item(id: i64, name: &str, overview: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "overview": overview,
        "poster_path": format!("/poster-{}.jpg", id),
        "genre_ids": [18],
    })
}

pub fn genre_body(entries: &[(i64, &str)]) -> Value {
    let genres: Vec<Value> = entries
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    json!({ "genres": genres })
}

pub fn tv_events_body(events: Vec<Value>) -> Value {
    json!({ "tvevents": events })
}

pub fn sport_event(id: &str, name: &str, date: &str) -> Value {
    json!({
        "idEvent": id,
        "strEvent": name,
        "strSport": "Soccer",
        "strHomeTeam": "Tottenham",
        "strAwayTeam": "Arsenal",
        "dateEvent": date,
        "strThumb": format!("https://example.com/thumb-{}.jpg", id),
    })
}
