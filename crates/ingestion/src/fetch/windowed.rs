//! Day-by-day traversal of televised sport events

use crate::fetch::FetchWindow;
use crate::provider::{SportEvent, SportsDbClient};
use crate::{IngestionError, Result};
use chrono::NaiveDate;
use media_catalog_core::retry::{retry_with_backoff, RetryPolicy};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::warn;

/// Pause between consecutive day queries. The provider meters per-caller
/// throughput, and pacing the sequential calls is the whole throttle.
pub const DEFAULT_CALL_DELAY: Duration = Duration::from_millis(600);

/// Lazy traversal of every day in a window, one provider call per day
///
/// Days are queried in calendar order with a pause before every call but
/// the first. Events whose date is missing, unparsable, or outside the
/// window are dropped here; the rest surface in day order.
///
/// A day that stays rate-limited through its retries is skipped with a
/// warning. Losing one day beats losing the rest of the window. Any other
/// provider failure ends the traversal with an error.
pub struct WindowedFetcher<'a> {
    client: &'a SportsDbClient,
    window: FetchWindow,
    remaining_days: VecDeque<NaiveDate>,
    call_delay: Duration,
    policy: RetryPolicy,
    buffer: VecDeque<SportEvent>,
    any_call_made: bool,
}

impl<'a> WindowedFetcher<'a> {
    pub fn new(client: &'a SportsDbClient, window: FetchWindow, policy: RetryPolicy) -> Self {
        Self {
            client,
            window,
            remaining_days: window.days().collect(),
            call_delay: DEFAULT_CALL_DELAY,
            policy,
            buffer: VecDeque::new(),
            any_call_made: false,
        }
    }

    /// Override the pause between day queries
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    /// Pull the next in-window event, querying further days as needed
    ///
    /// Returns `Ok(None)` once every day has been visited.
    pub async fn next(&mut self) -> Result<Option<SportEvent>> {
        loop {
            if let Some(event) = self.buffer.pop_front() {
                return Ok(Some(event));
            }
            let Some(day) = self.remaining_days.pop_front() else {
                return Ok(None);
            };
            self.fetch_day(day).await?;
        }
    }

    async fn fetch_day(&mut self, day: NaiveDate) -> Result<()> {
        if self.any_call_made {
            tokio::time::sleep(self.call_delay).await;
        }
        self.any_call_made = true;

        let result = retry_with_backoff(
            || self.client.events_on_day(day),
            self.policy.clone(),
            |err: &IngestionError| err.is_rate_limit(),
        )
        .await;

        let events = match result {
            Ok(events) => events,
            Err(err) if err.is_rate_limit() => {
                warn!(day = %day, "Rate limit persisted through retries, skipping day");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let window = self.window;
        self.buffer.extend(events.into_iter().filter(|event| {
            event
                .event_date
                .as_deref()
                .and_then(parse_event_date)
                .map(|date| window.contains(date))
                .unwrap_or(false)
        }));
        Ok(())
    }
}

fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_date_valid() {
        assert_eq!(
            parse_event_date("2024-09-15"),
            NaiveDate::from_ymd_opt(2024, 9, 15)
        );
        assert_eq!(
            parse_event_date(" 2024-09-15 "),
            NaiveDate::from_ymd_opt(2024, 9, 15)
        );
    }

    #[test]
    fn test_parse_event_date_rejects_garbage() {
        assert_eq!(parse_event_date(""), None);
        assert_eq!(parse_event_date("   "), None);
        assert_eq!(parse_event_date("15/09/2024"), None);
        assert_eq!(parse_event_date("2024-13-40"), None);
        assert_eq!(parse_event_date("soon"), None);
    }

    #[test]
    fn test_default_call_delay() {
        assert_eq!(DEFAULT_CALL_DELAY, Duration::from_millis(600));
    }
}
