//! Shared fixtures: a scripted market-data provider and envelope helpers.

#![allow(dead_code)]

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use stock_ticker_core::{
    Credentials, DailyClose, MarketDataProvider, QueryWindow, UpstreamError,
};

/// What the stub answers on every call.
#[derive(Debug, Clone)]
pub enum Reply {
    Closes(Vec<DailyClose>),
    Forbidden,
    Status(u16),
    Network,
}

/// Provider that replays a fixed reply and records how it was called.
pub struct StubProvider {
    reply: Reply,
    calls: AtomicUsize,
    last_window: Mutex<Option<QueryWindow>>,
    last_ticker: Mutex<Option<String>>,
}

impl StubProvider {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_window: Mutex::new(None),
            last_ticker: Mutex::new(None),
        }
    }

    pub fn closes(closes: &[(i64, f64)]) -> Self {
        Self::new(Reply::Closes(
            closes
                .iter()
                .map(|&(timestamp_ms, close)| DailyClose {
                    timestamp_ms,
                    close,
                })
                .collect(),
        ))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_window(&self) -> Option<QueryWindow> {
        *self.last_window.lock().unwrap()
    }

    pub fn last_ticker(&self) -> Option<String> {
        self.last_ticker.lock().unwrap().clone()
    }

    fn answer(
        &self,
        credentials: &Credentials<'_>,
        window: QueryWindow,
    ) -> Result<Vec<DailyClose>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some(window);
        *self.last_ticker.lock().unwrap() = Some(credentials.stock_ticker.to_string());
        match &self.reply {
            Reply::Closes(c) => Ok(c.clone()),
            Reply::Forbidden => Err(UpstreamError::Forbidden),
            Reply::Status(status) => Err(UpstreamError::Status { status: *status }),
            Reply::Network => Err(UpstreamError::Network("connection refused".into())),
        }
    }
}

impl MarketDataProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn probe(
        &self,
        credentials: &Credentials<'_>,
        window: QueryWindow,
    ) -> Result<(), UpstreamError> {
        self.answer(credentials, window).map(|_| ())
    }

    fn daily_closes(
        &self,
        credentials: &Credentials<'_>,
        window: QueryWindow,
    ) -> Result<Vec<DailyClose>, UpstreamError> {
        self.answer(credentials, window)
    }
}

/// Parse newline-delimited envelopes into JSON values.
pub fn parse_lines(out: &[u8]) -> Vec<Value> {
    std::str::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}
