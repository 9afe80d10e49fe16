//! Pull-based fetchers over the provider clients
//!
//! Both fetchers expose the same shape: construct one per traversal, then
//! pull items with `next()` until it yields `Ok(None)`. They are lazy
//! (provider calls happen on demand as the caller consumes items) and
//! non-restartable; a new traversal needs a new fetcher.

pub mod paged;
pub mod windowed;

pub use paged::{PagedFetcher, PAGE_CAP};
pub use windowed::WindowedFetcher;

use chrono::{Datelike, Months, NaiveDate};

/// An inclusive calendar-date range bounding a windowed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Window covering the whole calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next_month| next_month.pred_opt())
            .unwrap_or(date);
        Self { start, end }
    }

    /// Window spanning an arbitrary inclusive range
    ///
    /// A range whose end precedes its start contains no days.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The days of the window in calendar order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        let first = if self.start <= end { Some(self.start) } else { None };
        std::iter::successors(first, move |day| {
            day.succ_opt().filter(|next| *next <= end)
        })
    }

    /// Whether a date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
