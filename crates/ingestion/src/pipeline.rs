//! Scheduled pipeline runner
//!
//! Composes the per-source orchestrations into one daily run. Sources run
//! in a fixed order (movie, sport, TV) and are isolated from each other: a
//! source that fails is recorded in the run report and the remaining
//! sources still execute.

use crate::config::ScheduleConfig;
use crate::fetch::FetchWindow;
use crate::orchestrator::{IngestionOrchestrator, RunStats};
use crate::provider::{SportsDbClient, TmdbClient};
use crate::repository::ContentRepository;
use crate::vocabulary::VocabularyCache;
use crate::Result;
use chrono::{DateTime, Local, NaiveTime};
use media_catalog_core::models::SourceType;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Outcome of one source within a run
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: SourceType,
    pub result: Result<RunStats>,
}

/// Outcome of one full pipeline run, in execution order
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<SourceOutcome>,
}

impl RunReport {
    pub fn outcome(&self, source: SourceType) -> Option<&SourceOutcome> {
        self.outcomes.iter().find(|o| o.source == source)
    }
}

/// The daily ingestion pipeline
pub struct IngestionPipeline {
    orchestrator: IngestionOrchestrator,
    schedule: ScheduleConfig,
}

impl IngestionPipeline {
    pub fn new(
        tmdb: Arc<TmdbClient>,
        sportsdb: Arc<SportsDbClient>,
        repository: Arc<dyn ContentRepository>,
        schedule: ScheduleConfig,
    ) -> Self {
        let orchestrator = IngestionOrchestrator::new(tmdb, sportsdb, repository)
            .with_sport_call_delay(schedule.sport_call_delay);
        Self {
            orchestrator,
            schedule,
        }
    }

    /// Run every source once
    ///
    /// The sport window is the calendar month containing today. The genre
    /// vocabulary cache lives exactly as long as this call.
    pub async fn run_once(&self) -> RunReport {
        info!("Starting ingestion run");
        let mut cache = VocabularyCache::new();
        let mut report = RunReport::default();

        let movie = self
            .orchestrator
            .ingest_movies(&self.schedule.movie_query, &mut cache)
            .await;
        record(&mut report, SourceType::Movie, movie);

        let window = FetchWindow::month_of(Local::now().date_naive());
        let sport = self.orchestrator.ingest_sport(window).await;
        record(&mut report, SourceType::Sport, sport);

        let tv = self
            .orchestrator
            .ingest_tv(&self.schedule.tv_query, &mut cache)
            .await;
        record(&mut report, SourceType::Tv, tv);

        info!("Ingestion run completed");
        report
    }

    /// Spawn the background task that runs the pipeline daily
    ///
    /// The task sleeps until the configured local time, runs once, and
    /// repeats. Source failures are already contained by [`Self::run_once`],
    /// so the task itself never exits.
    pub fn spawn_daily_task(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let run_at = self.schedule.run_at;
        tokio::spawn(async move {
            loop {
                let delay = until_next_run(Local::now(), run_at);
                info!(
                    delay_secs = delay.as_secs(),
                    "Next ingestion run scheduled"
                );
                tokio::time::sleep(delay).await;
                self.run_once().await;
            }
        })
    }
}

fn record(report: &mut RunReport, source: SourceType, result: Result<RunStats>) {
    if let Err(ref err) = result {
        error!(source = %source, error = %err, "Source ingestion failed");
    }
    report.outcomes.push(SourceOutcome { source, result });
}

/// Duration until the next occurrence of `run_at`, never zero
///
/// A run scheduled for the current instant waits a full day; the scheduler
/// sleeps before running, so "now" has already happened.
fn until_next_run(now: DateTime<Local>, run_at: NaiveTime) -> Duration {
    let today_run = now.date_naive().and_time(run_at);
    let next = if now.naive_local() < today_run {
        today_run
    } else {
        today_run + chrono::Duration::days(1)
    };
    (next - now.naive_local())
        .to_std()
        .unwrap_or(Duration::from_secs(1))
}
