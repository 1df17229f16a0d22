//! Connectivity check.
//!
//! Issues the same bounded query a read would, and maps the outcome onto a
//! pass/fail [`ConnectionStatus`]. A failed check is a *reported* outcome, not
//! a process failure.

use stock_ticker_core::{
    Clock, ConnectionStatus, MarketDataProvider, QueryWindow, SourceConfig, UpstreamError,
};
use tracing::{info, warn};

/// Reported when the upstream answers 403.
pub const API_KEY_INCORRECT: &str = "API Key is incorrect";

/// Reported for every other failure, network faults included.
pub const CONFIG_INCORRECT: &str = "Input configuration is incorrect";

/// Probe the upstream with the configured ticker and key.
///
/// A config without both credentials fails without touching the network.
pub fn check(
    config: &SourceConfig,
    provider: &dyn MarketDataProvider,
    clock: &dyn Clock,
) -> ConnectionStatus {
    let Some(credentials) = config.credentials() else {
        warn!("config is missing stock_ticker or api_key");
        return ConnectionStatus::failed(CONFIG_INCORRECT);
    };

    let window = QueryWindow::ending_today(clock);
    match provider.probe(&credentials, window) {
        Ok(()) => {
            info!(
                provider = provider.name(),
                ticker = credentials.stock_ticker,
                "connection check succeeded"
            );
            ConnectionStatus::succeeded()
        }
        Err(UpstreamError::Forbidden) => {
            warn!(provider = provider.name(), "upstream rejected the API key");
            ConnectionStatus::failed(API_KEY_INCORRECT)
        }
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "connection check failed");
            ConnectionStatus::failed(CONFIG_INCORRECT)
        }
    }
}
