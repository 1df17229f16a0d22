//! Extracted price records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily closing price for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub stock_ticker: String,
    pub price: f64,
}

/// Calendar date (UTC) of an epoch-milliseconds timestamp.
///
/// Sub-second precision is discarded before conversion, so the date is the one
/// containing `timestamp_ms / 1000` seconds. Returns `None` if the timestamp is
/// outside chrono's representable range.
pub fn session_date(timestamp_ms: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(timestamp_ms.div_euclid(1000), 0)
        .map(|dt| dt.naive_utc().date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_timestamp_maps_to_utc_date() {
        // 2023-11-14T22:13:20Z
        assert_eq!(
            session_date(1_700_000_000_000),
            NaiveDate::from_ymd_opt(2023, 11, 14)
        );
    }

    #[test]
    fn midnight_boundary() {
        // 2024-01-02T00:00:00Z and one millisecond before it
        assert_eq!(
            session_date(1_704_153_600_000),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert_eq!(
            session_date(1_704_153_599_999),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn pre_epoch_rounds_down() {
        assert_eq!(session_date(-1), NaiveDate::from_ymd_opt(1969, 12, 31));
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(session_date(i64::MAX), None);
    }
}
