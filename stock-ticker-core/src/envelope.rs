//! Wire envelopes: the line-oriented protocol spoken to the orchestrator.
//!
//! Every unit of output is one [`Envelope`], serialized as a single JSON object
//! on its own line. The `type` tag selects the payload key:
//!
//! | type                | payload key        |
//! |---------------------|--------------------|
//! | `SPEC`              | `spec`             |
//! | `CONNECTION_STATUS` | `connectionStatus` |
//! | `CATALOG`           | `catalog`          |
//! | `RECORD`            | `record`           |
//! | `LOG`               | `log`              |
//! | `TRACE`             | `trace`            |
//!
//! Envelopes are immutable once built and are written exactly once, in the
//! order they are produced.

use crate::catalog::CatalogDescriptor;
use crate::record::PriceRecord;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// A single typed, self-describing unit of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Envelope {
    /// The static configuration-schema document.
    Spec { spec: serde_json::Value },

    /// Outcome of a connectivity check.
    ConnectionStatus {
        #[serde(rename = "connectionStatus")]
        connection_status: ConnectionStatus,
    },

    /// The streams this connector can produce.
    Catalog { catalog: CatalogDescriptor },

    /// One extracted record.
    Record { record: RecordMessage },

    /// Free-form log line for the orchestrator.
    Log { log: String },

    /// Structured error report.
    Trace { trace: TraceMessage },
}

impl Envelope {
    pub fn spec(spec: serde_json::Value) -> Self {
        Self::Spec { spec }
    }

    pub fn connection_status(status: ConnectionStatus) -> Self {
        Self::ConnectionStatus {
            connection_status: status,
        }
    }

    pub fn catalog(catalog: CatalogDescriptor) -> Self {
        Self::Catalog { catalog }
    }

    pub fn record(stream: impl Into<String>, data: PriceRecord, emitted_at: i64) -> Self {
        Self::Record {
            record: RecordMessage {
                stream: stream.into(),
                data,
                emitted_at,
            },
        }
    }

    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            log: message.into(),
        }
    }

    /// Build an ERROR trace carrying `message`.
    pub fn trace_error(message: impl Into<String>, emitted_at: i64) -> Self {
        Self::Trace {
            trace: TraceMessage {
                kind: TraceKind::Error,
                emitted_at,
                error: TraceError {
                    message: message.into(),
                },
            },
        }
    }

    /// Protocol name of this envelope's `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Spec { .. } => "SPEC",
            Self::ConnectionStatus { .. } => "CONNECTION_STATUS",
            Self::Catalog { .. } => "CATALOG",
            Self::Record { .. } => "RECORD",
            Self::Log { .. } => "LOG",
            Self::Trace { .. } => "TRACE",
        }
    }
}

/// Pass/fail flag of a connectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Succeeded,
    Failed,
}

/// Payload of a `CONNECTION_STATUS` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConnectionStatus {
    pub fn succeeded() -> Self {
        Self {
            status: Status::Succeeded,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Succeeded
    }
}

/// Payload of a `RECORD` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMessage {
    pub stream: String,
    pub data: PriceRecord,
    /// Epoch milliseconds at emission time.
    pub emitted_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraceKind {
    Error,
}

/// Payload of a `TRACE` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceMessage {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub emitted_at: i64,
    pub error: TraceError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceError {
    pub message: String,
}

/// Writes envelopes as newline-delimited JSON, flushing after every line.
///
/// Flushing per envelope keeps emission streaming: the orchestrator sees each
/// record as soon as it is produced.
pub struct EnvelopeWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> EnvelopeWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Serialize one envelope as a single line and flush it.
    pub fn emit(&mut self, envelope: &Envelope) -> io::Result<()> {
        serde_json::to_writer(&mut self.inner, envelope)?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Number of envelopes written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
