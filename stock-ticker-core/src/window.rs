//! Query window construction.
//!
//! Every run queries the trailing week ending today: `[today - 7 days, today]`.
//! The window is never derived from sync state.

use crate::clock::Clock;
use chrono::{Days, NaiveDate};
use std::fmt;

/// Number of days the window reaches back from today.
pub const LOOKBACK_DAYS: u64 = 7;

/// Inclusive date range submitted to the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl QueryWindow {
    /// The window ending on `today`.
    pub fn trailing(today: NaiveDate) -> Self {
        let from = today
            .checked_sub_days(Days::new(LOOKBACK_DAYS))
            .unwrap_or(NaiveDate::MIN);
        Self { from, to: today }
    }

    /// The window ending on the clock's current date.
    pub fn ending_today(clock: &dyn Clock) -> Self {
        Self::trailing(clock.today())
    }

    /// Span of the window in days.
    pub fn span_days(&self) -> i64 {
        (self.to - self.from).num_days()
    }
}

impl fmt::Display for QueryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}
