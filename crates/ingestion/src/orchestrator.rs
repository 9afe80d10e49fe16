//! Per-source ingestion orchestration
//!
//! The orchestrator drives one source at a time from fetch to persistence.
//! Each pulled item goes through the same gauntlet: admission check, dedup
//! probe, the TV-only language filter, mapping to a normalized record, tag
//! resolution, then a synchronous save. Persistence happens item by item,
//! so an item saved early in a run is already visible to the dedup probe of
//! a later item in the same run.

use crate::fetch::{FetchWindow, PagedFetcher, WindowedFetcher};
use crate::language::contains_hangul;
use crate::provider::{CatalogListing, SearchKind, SportEvent, SportsDbClient, TmdbClient};
use crate::repository::ContentRepository;
use crate::vocabulary::VocabularyCache;
use crate::{IngestionError, Result};
use media_catalog_core::models::{ContentRecord, ContentTag, SourceType};
use media_catalog_core::retry::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Counters for one source's run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Items the provider returned
    pub fetched: u32,
    /// Items rejected for missing required fields
    pub invalid: u32,
    /// Items skipped because the external id already exists
    pub duplicate: u32,
    /// TV items rejected by the Korean-title filter
    pub non_korean: u32,
    /// Items written to storage
    pub persisted: u32,
}

impl RunStats {
    fn log_summary(&self, source: SourceType) {
        info!(
            source = %source,
            fetched = self.fetched,
            invalid = self.invalid,
            duplicate = self.duplicate,
            non_korean = self.non_korean,
            persisted = self.persisted,
            "Source ingestion completed"
        );
    }
}

/// Drives one source's ingestion from provider fetch to persistence
pub struct IngestionOrchestrator {
    tmdb: Arc<TmdbClient>,
    sportsdb: Arc<SportsDbClient>,
    repository: Arc<dyn ContentRepository>,
    retry_policy: RetryPolicy,
    sport_call_delay: Duration,
}

impl IngestionOrchestrator {
    pub fn new(
        tmdb: Arc<TmdbClient>,
        sportsdb: Arc<SportsDbClient>,
        repository: Arc<dyn ContentRepository>,
    ) -> Self {
        Self {
            tmdb,
            sportsdb,
            repository,
            retry_policy: RetryPolicy::rate_limit(),
            sport_call_delay: crate::fetch::windowed::DEFAULT_CALL_DELAY,
        }
    }

    /// Override the rate-limit retry policy (tests use fast delays)
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Override the pause between sport day queries
    pub fn with_sport_call_delay(mut self, delay: Duration) -> Self {
        self.sport_call_delay = delay;
        self
    }

    /// Ingest movie search results for a query
    pub async fn ingest_movies(
        &self,
        query: &str,
        cache: &mut VocabularyCache,
    ) -> Result<RunStats> {
        self.ingest_catalog(SearchKind::Movie, query, cache).await
    }

    /// Ingest TV search results for a query
    ///
    /// Unlike movies, TV listings must carry a Korean title to be admitted.
    pub async fn ingest_tv(&self, query: &str, cache: &mut VocabularyCache) -> Result<RunStats> {
        self.ingest_catalog(SearchKind::Tv, query, cache).await
    }

    async fn ingest_catalog(
        &self,
        kind: SearchKind,
        query: &str,
        cache: &mut VocabularyCache,
    ) -> Result<RunStats> {
        let source = match kind {
            SearchKind::Movie => SourceType::Movie,
            SearchKind::Tv => SourceType::Tv,
        };
        info!(source = %source, query = query, "Starting source ingestion");

        let mut stats = RunStats::default();
        let mut fetcher = PagedFetcher::new(&self.tmdb, kind, query, self.retry_policy.clone());

        while let Some(listing) = fetcher.next().await? {
            stats.fetched += 1;
            self.process_listing(source, kind, listing, cache, &mut stats)
                .await?;
        }

        stats.log_summary(source);
        Ok(stats)
    }

    async fn process_listing(
        &self,
        source: SourceType,
        kind: SearchKind,
        listing: CatalogListing,
        cache: &mut VocabularyCache,
        stats: &mut RunStats,
    ) -> Result<()> {
        let CatalogListing {
            external_id,
            title,
            overview,
            poster_url,
            genre_ids,
            ..
        } = listing;

        let Some(external_id) = non_blank(external_id) else {
            stats.invalid += 1;
            return Ok(());
        };
        let Some(title) = non_blank(title) else {
            stats.invalid += 1;
            return Ok(());
        };
        let Some(description) = non_blank(overview) else {
            stats.invalid += 1;
            return Ok(());
        };

        if self.exists(source, &external_id).await? {
            stats.duplicate += 1;
            return Ok(());
        }

        if kind == SearchKind::Tv && !contains_hangul(&title) {
            stats.non_korean += 1;
            return Ok(());
        }

        let vocabulary = cache.resolve(&self.tmdb, kind, &self.retry_policy).await;
        let tags: Vec<ContentTag> = genre_ids
            .iter()
            .map(|&id| ContentTag::genre(id, vocabulary.name_of(id).map(str::to_string)))
            .collect();

        let mut record = ContentRecord::new(source, external_id, title);
        record.description = Some(description);
        record.thumbnail_url = poster_url;

        self.persist(record, &tags, stats).await
    }

    /// Ingest televised sport events across a window of days
    pub async fn ingest_sport(&self, window: FetchWindow) -> Result<RunStats> {
        info!(
            source = %SourceType::Sport,
            start = %window.start,
            end = %window.end,
            "Starting source ingestion"
        );

        let mut stats = RunStats::default();
        let mut fetcher = WindowedFetcher::new(&self.sportsdb, window, self.retry_policy.clone())
            .with_call_delay(self.sport_call_delay);

        while let Some(event) = fetcher.next().await? {
            stats.fetched += 1;
            self.process_event(event, &mut stats).await?;
        }

        stats.log_summary(SourceType::Sport);
        Ok(stats)
    }

    async fn process_event(&self, event: SportEvent, stats: &mut RunStats) -> Result<()> {
        let SportEvent {
            external_id,
            name,
            sport,
            home_team,
            away_team,
            thumbnail_url,
            ..
        } = event;

        let Some(external_id) = non_blank(external_id) else {
            stats.invalid += 1;
            return Ok(());
        };
        let Some(name) = non_blank(name) else {
            stats.invalid += 1;
            return Ok(());
        };

        if self.exists(SourceType::Sport, &external_id).await? {
            stats.duplicate += 1;
            return Ok(());
        }

        // A matchup reads better than the raw event name; the discipline is
        // the fallback when either team is missing.
        let sport_name = non_blank(sport);
        let description = match (non_blank(home_team), non_blank(away_team)) {
            (Some(home), Some(away)) => Some(format!("{} vs {}", home, away)),
            _ => sport_name.clone(),
        };

        let tags: Vec<ContentTag> = sport_name
            .map(|name| ContentTag::named(name))
            .into_iter()
            .collect();

        let mut record = ContentRecord::new(SourceType::Sport, external_id, name);
        record.description = description;
        record.thumbnail_url = non_blank(thumbnail_url);

        self.persist(record, &tags, stats).await
    }

    async fn exists(&self, source: SourceType, external_id: &str) -> Result<bool> {
        self.repository
            .exists_by_external_id(source, external_id)
            .await
            .map_err(database_error)
    }

    async fn persist(
        &self,
        record: ContentRecord,
        tags: &[ContentTag],
        stats: &mut RunStats,
    ) -> Result<()> {
        let content_id = self
            .repository
            .save(&record)
            .await
            .map_err(database_error)?;

        for tag in tags {
            self.repository
                .save_tag(content_id, tag)
                .await
                .map_err(database_error)?;
        }

        stats.persisted += 1;
        Ok(())
    }
}

fn database_error(err: anyhow::Error) -> IngestionError {
    IngestionError::DatabaseError(err.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("ok".to_string())), Some("ok".to_string()));
        assert_eq!(non_blank(Some("".to_string())), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
