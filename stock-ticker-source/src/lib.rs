//! Stock Ticker Source: the four connector operations.
//!
//! This crate builds on `stock-ticker-core` to provide:
//! - `spec` / `discover`: static declarations of config schema and streams
//! - `check`: one upstream probe mapped onto a connection status
//! - `read`: validated full-refresh extraction streamed as RECORD envelopes

pub mod check;
pub mod read;
pub mod schema;

pub use check::{check, API_KEY_INCORRECT, CONFIG_INCORRECT};
pub use read::{read, ReadError, ReadSummary, ValidationError, UPSTREAM_FAILURE};
pub use schema::{discover, spec};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn read_summary_is_send_sync() {
        assert_send::<ReadSummary>();
        assert_sync::<ReadSummary>();
    }

    #[test]
    fn read_error_is_send_sync() {
        assert_send::<ReadError>();
        assert_sync::<ReadError>();
    }
}
