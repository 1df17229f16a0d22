//! Market-data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over the upstream API so the check
//! and read operations can be driven by a stub in tests.

use crate::config::Credentials;
use crate::window::QueryWindow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily aggregate as returned upstream, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    /// Session start, epoch milliseconds.
    pub timestamp_ms: i64,
    /// Closing price.
    pub close: f64,
}

/// Structured error types for upstream calls.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream rejected the API key (HTTP 403)")]
    Forbidden,

    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl UpstreamError {
    /// HTTP status behind this error, if the request got a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Forbidden => Some(403),
            Self::Status { status } => Some(*status),
            Self::Network(_) | Self::ResponseFormatChanged(_) | Self::InvalidEndpoint(_) => None,
        }
    }
}

/// Trait for market-data providers.
///
/// Each call issues exactly one request; implementations never retry.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Issue the window query and report only whether it returned HTTP 200.
    /// The response body is not inspected.
    fn probe(&self, credentials: &Credentials<'_>, window: QueryWindow)
        -> Result<(), UpstreamError>;

    /// Fetch daily closes for the window, in the order the upstream returns
    /// them (ascending by date).
    fn daily_closes(
        &self,
        credentials: &Credentials<'_>,
        window: QueryWindow,
    ) -> Result<Vec<DailyClose>, UpstreamError>;
}
