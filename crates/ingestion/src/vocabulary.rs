//! Genre vocabulary resolution
//!
//! The catalog provider keeps a separate id-to-name genre taxonomy per
//! search kind. A run resolves each taxonomy at most once and holds it in a
//! run-scoped cache, so genre names stay consistent within a run and go
//! stale no further than the next one.

use crate::provider::{GenreEntry, SearchKind, TmdbClient};
use crate::IngestionError;
use media_catalog_core::retry::{retry_with_backoff, RetryPolicy};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Id-to-name mapping for one genre taxonomy
///
/// When the provider repeats an id, the first occurrence keeps its name and
/// later ones are ignored.
#[derive(Debug, Clone, Default)]
pub struct TagVocabulary {
    entries: HashMap<i64, String>,
}

impl TagVocabulary {
    /// Build from provider entries in response order
    pub fn from_entries(entries: Vec<GenreEntry>) -> Self {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            map.entry(entry.id).or_insert(entry.name);
        }
        Self { entries: map }
    }

    /// Look up the name registered for a genre id
    pub fn name_of(&self, genre_id: i64) -> Option<&str> {
        self.entries.get(&genre_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run-scoped cache of resolved vocabularies
///
/// One instance lives for the duration of a pipeline run. Dropping it at
/// run end is what expires the cached taxonomies.
#[derive(Debug, Default)]
pub struct VocabularyCache {
    movie: Option<TagVocabulary>,
    tv: Option<TagVocabulary>,
}

impl VocabularyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the vocabulary for a search kind, fetching it on first use
    ///
    /// An empty genre list is a valid vocabulary, not a failure. A fetch
    /// that fails terminally also degrades to an empty vocabulary with a
    /// warning: listings then keep their genre ids with absent names, and
    /// ingestion continues.
    pub async fn resolve(
        &mut self,
        client: &TmdbClient,
        kind: SearchKind,
        policy: &RetryPolicy,
    ) -> &TagVocabulary {
        let slot = match kind {
            SearchKind::Movie => &mut self.movie,
            SearchKind::Tv => &mut self.tv,
        };
        if slot.is_none() {
            *slot = Some(fetch_vocabulary(client, kind, policy).await);
        }
        slot.get_or_insert_with(TagVocabulary::default)
    }
}

async fn fetch_vocabulary(
    client: &TmdbClient,
    kind: SearchKind,
    policy: &RetryPolicy,
) -> TagVocabulary {
    let result = retry_with_backoff(
        || client.genre_list(kind),
        policy.clone(),
        |err: &IngestionError| err.is_rate_limit(),
    )
    .await;

    match result {
        Ok(entries) => {
            let vocabulary = TagVocabulary::from_entries(entries);
            debug!(kind = ?kind, genres = vocabulary.len(), "Resolved genre vocabulary");
            vocabulary
        }
        Err(err) => {
            warn!(
                kind = ?kind,
                error = %err,
                "Genre vocabulary fetch failed, continuing without genre names"
            );
            TagVocabulary::default()
        }
    }
}
