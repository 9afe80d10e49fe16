//! Paged traversal of catalog search results

use crate::provider::{CatalogListing, SearchKind, TmdbClient};
use crate::{IngestionError, Result};
use media_catalog_core::retry::{retry_with_backoff, RetryPolicy};
use std::collections::VecDeque;
use tracing::debug;

/// Hard ceiling on pages fetched per query, regardless of how many pages
/// the provider reports.
pub const PAGE_CAP: u32 = 5;

/// Lazy traversal of up to [`PAGE_CAP`] search pages for one query
///
/// Pages are requested strictly in order and only when the caller has
/// drained the buffered items. The first page decides the traversal length:
/// an empty first page ends it after that single call, otherwise the page
/// count is the provider's `total_pages` clamped to the cap.
///
/// Rate-limited calls are retried per the policy; a page that still fails
/// afterwards fails the whole traversal.
pub struct PagedFetcher<'a> {
    client: &'a TmdbClient,
    kind: SearchKind,
    query: String,
    policy: RetryPolicy,
    next_page: u32,
    last_page: Option<u32>,
    buffer: VecDeque<CatalogListing>,
    done: bool,
}

impl<'a> PagedFetcher<'a> {
    pub fn new(
        client: &'a TmdbClient,
        kind: SearchKind,
        query: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            kind,
            query: query.into(),
            policy,
            next_page: 1,
            last_page: None,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Pull the next listing, fetching further pages as needed
    ///
    /// Returns `Ok(None)` once the traversal is exhausted.
    pub async fn next(&mut self) -> Result<Option<CatalogListing>> {
        loop {
            if let Some(listing) = self.buffer.pop_front() {
                return Ok(Some(listing));
            }
            if self.done {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let page_number = self.next_page;
        let page = retry_with_backoff(
            || self.client.search_page(self.kind, &self.query, page_number),
            self.policy.clone(),
            |err: &IngestionError| err.is_rate_limit(),
        )
        .await?;

        if page_number == 1 {
            if page.results.is_empty() {
                // An empty first page means no results at all; later pages
                // are never probed.
                self.done = true;
                return Ok(());
            }
            let last_page = page.total_pages.clamp(1, PAGE_CAP);
            debug!(
                kind = ?self.kind,
                total_pages = page.total_pages,
                last_page = last_page,
                "Starting paged traversal"
            );
            self.last_page = Some(last_page);
        }

        self.buffer.extend(page.results);
        if page_number >= self.last_page.unwrap_or(1) {
            self.done = true;
        }
        self.next_page += 1;
        Ok(())
    }
}
