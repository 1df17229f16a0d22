//! Full-refresh extraction of the `stock_prices` stream.
//!
//! Preconditions are checked in order and the first failure wins:
//! 1. config carries both `api_key` and `stock_ticker`
//! 2. the configured catalog selects `stock_prices`
//! 3. the selected sync mode is one the stream supports
//!
//! Only then is the upstream queried, once, for the trailing window. Every
//! timestamp is checked before the first record is written, so a read either
//! emits all of its records or none of them. Records are then written one
//! line at a time.

use chrono::NaiveDate;
use std::io::Write;
use stock_ticker_core::catalog::{self, STOCK_PRICES_STREAM};
use stock_ticker_core::record::session_date;
use stock_ticker_core::{
    Clock, DailyClose, Envelope, EnvelopeWriter, MarketDataProvider, PriceRecord, QueryWindow,
    SelectedCatalog, SourceConfig, UpstreamError,
};
use thiserror::Error;
use tracing::{error, info};

/// Trace message for any upstream failure during a read.
pub const UPSTREAM_FAILURE: &str = "Failure occurred when calling the upstream API";

/// A read request that cannot be served.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Input config must contain the properties 'api_key' and 'stock_ticker'")]
    MissingCredentials,

    #[error("Catalog does not select the '{0}' stream")]
    StreamNotSelected(String),

    #[error("Sync mode '{0}' is not supported; this connector only supports full refresh syncs")]
    UnsupportedSyncMode(String),
}

/// Errors from the read operation.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("upstream call failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("cannot write to output: {0}")]
    Output(#[from] std::io::Error),
}

impl ReadError {
    /// Message for the TRACE envelope reporting this failure.
    ///
    /// `None` for output failures, which cannot be reported on the broken
    /// channel itself.
    pub fn trace_message(&self) -> Option<String> {
        match self {
            Self::Validation(v) => Some(v.to_string()),
            Self::Upstream(_) => Some(UPSTREAM_FAILURE.to_string()),
            Self::Output(_) => None,
        }
    }
}

/// Outcome of a successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSummary {
    pub window: QueryWindow,
    pub records_emitted: usize,
}

/// Check that the configured catalog asks for something this connector serves.
pub fn validate_catalog(selected: &SelectedCatalog) -> Result<(), ValidationError> {
    let entry = selected
        .find(STOCK_PRICES_STREAM)
        .ok_or_else(|| ValidationError::StreamNotSelected(STOCK_PRICES_STREAM.to_string()))?;

    let supported = catalog::discover()
        .stream(STOCK_PRICES_STREAM)
        .is_some_and(|s| s.supports(&entry.sync_mode));
    if !supported {
        return Err(ValidationError::UnsupportedSyncMode(entry.sync_mode.clone()));
    }
    Ok(())
}

/// Session date of an upstream close.
fn session_of(close: &DailyClose) -> Result<NaiveDate, UpstreamError> {
    session_date(close.timestamp_ms).ok_or_else(|| {
        UpstreamError::ResponseFormatChanged(format!("invalid timestamp: {}", close.timestamp_ms))
    })
}

/// Run a full-refresh read, writing one RECORD envelope per upstream result.
pub fn read<W: Write>(
    config: &SourceConfig,
    selected: &SelectedCatalog,
    provider: &dyn MarketDataProvider,
    clock: &dyn Clock,
    out: &mut EnvelopeWriter<W>,
) -> Result<ReadSummary, ReadError> {
    let credentials = config
        .credentials()
        .ok_or(ValidationError::MissingCredentials)?;
    validate_catalog(selected)?;

    let window = QueryWindow::ending_today(clock);
    let closes = provider
        .daily_closes(&credentials, window)
        .map_err(|e| {
            error!(provider = provider.name(), error = %e, "upstream call failed");
            e
        })?;

    // reject the batch before anything is written
    for close in &closes {
        session_of(close)?;
    }

    for close in &closes {
        let record = PriceRecord {
            date: session_of(close)?,
            stock_ticker: credentials.stock_ticker.to_string(),
            price: close.close,
        };
        out.emit(&Envelope::record(
            STOCK_PRICES_STREAM,
            record,
            clock.emitted_at(),
        ))?;
    }

    let summary = ReadSummary {
        window,
        records_emitted: closes.len(),
    };
    info!(
        ticker = credentials.stock_ticker,
        %window,
        records = summary.records_emitted,
        "read complete"
    );
    Ok(summary)
}
