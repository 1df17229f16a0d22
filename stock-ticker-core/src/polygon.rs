//! Polygon.io data provider.
//!
//! Fetches daily aggregates from the v2 aggregates endpoint:
//!
//! ```text
//! GET {base}/v2/aggs/ticker/{ticker}/range/1/day/{from}/{to}?sort=asc&limit={n}&apiKey={key}
//! ```
//!
//! One request per call. No retries, no pagination, no timeout beyond the HTTP
//! client's defaults.

use crate::config::Credentials;
use crate::provider::{DailyClose, MarketDataProvider, UpstreamError};
use crate::settings::ConnectorSettings;
use crate::window::QueryWindow;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

/// Aggregates endpoint response. `results` is omitted when the window holds
/// no trading sessions.
#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    #[serde(default)]
    results: Vec<AggregateBar>,
}

#[derive(Debug, Deserialize)]
struct AggregateBar {
    /// Session start, epoch milliseconds.
    t: i64,
    /// Close price.
    c: f64,
}

/// Polygon.io data provider.
pub struct PolygonClient {
    client: reqwest::blocking::Client,
    base_url: String,
    result_limit: u32,
}

impl PolygonClient {
    pub fn new(settings: &ConnectorSettings) -> Result<Self, UpstreamError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("source-stock-ticker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(client, settings))
    }

    /// Use a preconfigured HTTP client.
    pub fn with_http_client(
        client: reqwest::blocking::Client,
        settings: &ConnectorSettings,
    ) -> Self {
        Self {
            client,
            base_url: settings.base_url().to_string(),
            result_limit: settings.result_limit,
        }
    }

    /// Build the aggregates URL (without query string) for a ticker and window.
    ///
    /// Each path segment is percent-encoded, so the ticker cannot alter the
    /// route or the query.
    fn aggregates_url(&self, ticker: &str, window: QueryWindow) -> Result<Url, UpstreamError> {
        let invalid = || UpstreamError::InvalidEndpoint(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        let from = window.from.format("%Y-%m-%d").to_string();
        let to = window.to.format("%Y-%m-%d").to_string();
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend([
                "v2",
                "aggs",
                "ticker",
                ticker,
                "range",
                "1",
                "day",
                from.as_str(),
                to.as_str(),
            ]);
        Ok(url)
    }

    /// Send the window query and require HTTP 200.
    fn send(
        &self,
        credentials: &Credentials<'_>,
        window: QueryWindow,
    ) -> Result<reqwest::blocking::Response, UpstreamError> {
        let url = self.aggregates_url(credentials.stock_ticker, window)?;
        let limit = self.result_limit.to_string();
        debug!(ticker = credentials.stock_ticker, %window, "requesting daily aggregates");

        let resp = self
            .client
            .get(url)
            .query(&[
                ("sort", "asc"),
                ("limit", limit.as_str()),
                ("apiKey", credentials.api_key),
            ])
            .send()
            .map_err(|e| {
                // the URL carries the API key in its query string
                let e = e.without_url();
                warn!(ticker = credentials.stock_ticker, "request failed: {e}");
                UpstreamError::Network(e.to_string())
            })?;

        let status = resp.status();
        debug!(status = status.as_u16(), "upstream responded");

        if status == StatusCode::FORBIDDEN {
            return Err(UpstreamError::Forbidden);
        }
        if status != StatusCode::OK {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }
}

impl MarketDataProvider for PolygonClient {
    fn name(&self) -> &str {
        "polygon"
    }

    fn probe(
        &self,
        credentials: &Credentials<'_>,
        window: QueryWindow,
    ) -> Result<(), UpstreamError> {
        self.send(credentials, window).map(|_| ())
    }

    fn daily_closes(
        &self,
        credentials: &Credentials<'_>,
        window: QueryWindow,
    ) -> Result<Vec<DailyClose>, UpstreamError> {
        let resp = self.send(credentials, window)?;
        let body: AggregatesResponse = resp.json().map_err(|e| {
            UpstreamError::ResponseFormatChanged(format!(
                "failed to parse aggregates for {}: {}",
                credentials.stock_ticker,
                e.without_url()
            ))
        })?;

        Ok(body
            .results
            .into_iter()
            .map(|bar| DailyClose {
                timestamp_ms: bar.t,
                close: bar.c,
            })
            .collect())
    }
}
