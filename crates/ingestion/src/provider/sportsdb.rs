//! TheSportsDB events client

use crate::provider::{extract_array, extract_string, SportEvent};
use crate::{IngestionError, Result};
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://www.thesportsdb.com/api/v1/json";

/// The provider's shared free-tier key, usable without registration.
pub const FREE_TIER_API_KEY: &str = "3";

const PROVIDER_NAME: &str = "sportsdb";

/// Client for the TheSportsDB REST API
///
/// The API key is a path segment rather than a query parameter.
pub struct SportsDbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SportsDbClient {
    /// Create a client against the production API
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a specific base URL
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

    /// Fetch the televised events scheduled on one day
    ///
    /// The provider answers with a `tvevents` array, an `events` array on
    /// some plan tiers, or a JSON null when the day has nothing scheduled.
    /// All three parse without error; null becomes an empty list.
    pub async fn events_on_day(&self, day: NaiveDate) -> Result<Vec<SportEvent>> {
        let url = format!(
            "{}/{}/eventstvday.php?d={}",
            self.base_url,
            self.api_key,
            day.format("%Y-%m-%d")
        );

        debug!(day = %day, "Fetching televised events");
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(IngestionError::RateLimitExceeded {
                provider: PROVIDER_NAME.to_string(),
            });
        }
        let response = response.error_for_status()?;
        let body: Value = response.json().await?;
        Ok(parse_events(&body))
    }
}

fn parse_events(body: &Value) -> Vec<SportEvent> {
    extract_array(body, "tvevents")
        .or_else(|| extract_array(body, "events"))
        .map(|events| events.iter().map(parse_event).collect())
        .unwrap_or_default()
}

fn parse_event(item: &Value) -> SportEvent {
    SportEvent {
        external_id: extract_string(item, "idEvent"),
        name: extract_string(item, "strEvent"),
        sport: extract_string(item, "strSport"),
        home_team: extract_string(item, "strHomeTeam"),
        away_team: extract_string(item, "strAwayTeam"),
        event_date: extract_string(item, "dateEvent"),
        thumbnail_url: extract_string(item, "strThumb"),
    }
}
