//! Clock capability.
//!
//! Everything that depends on "now" (the query window, `emitted_at` stamps)
//! reads it through [`Clock`], so tests can pin the date.

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date used to anchor the query window.
    fn today(&self) -> NaiveDate;

    /// Emission stamp: epoch milliseconds truncated to the whole second.
    fn emitted_at(&self) -> i64 {
        self.now().timestamp() * 1000
    }
}

/// Wall clock. "Today" is the host's local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at one instant. "Today" is that instant's UTC date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Frozen at noon UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default();
        Self { now: noon.and_utc() }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}
