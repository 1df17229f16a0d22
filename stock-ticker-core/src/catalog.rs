//! Stream catalog: the static declaration of what this connector produces.
//!
//! There is exactly one stream, `stock_prices`, extractable only with
//! `full_refresh`. Its field contract:
//!
//! - `date`: string (ISO calendar date)
//! - `price`: number (daily close)
//! - `stock_ticker`: string
//!
//! Both the catalog and the connector spec are pure functions of the build.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the single supported stream.
pub const STOCK_PRICES_STREAM: &str = "stock_prices";

/// Connector specification document, compiled into the binary.
const CONNECTOR_SPEC: &str = include_str!("../resources/spec.json");

/// Extraction strategy for a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    FullRefresh,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullRefresh => "full_refresh",
        }
    }
}

/// JSON-schema type of a stream field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
}

/// Declared type of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Field declarations of a stream. Ordered by name so serialization is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSchema {
    pub properties: BTreeMap<String, FieldSchema>,
}

/// One stream the connector can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub name: String,
    pub supported_sync_modes: Vec<SyncMode>,
    pub json_schema: StreamSchema,
}

impl StreamDescriptor {
    /// Whether `mode` (as named in a configured catalog) is supported.
    pub fn supports(&self, mode: &str) -> bool {
        self.supported_sync_modes.iter().any(|m| m.as_str() == mode)
    }
}

/// The full catalog returned by `discover`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDescriptor {
    pub streams: Vec<StreamDescriptor>,
}

impl CatalogDescriptor {
    pub fn stream(&self, name: &str) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.name == name)
    }
}

/// Fields of the `stock_prices` stream.
pub const STOCK_PRICES_FIELDS: &[(&str, FieldType)] = &[
    ("date", FieldType::String),
    ("price", FieldType::Number),
    ("stock_ticker", FieldType::String),
];

/// The catalog of streams this connector supports.
pub fn discover() -> CatalogDescriptor {
    let properties = STOCK_PRICES_FIELDS
        .iter()
        .map(|(name, field_type)| {
            (
                (*name).to_string(),
                FieldSchema {
                    field_type: *field_type,
                },
            )
        })
        .collect();

    CatalogDescriptor {
        streams: vec![StreamDescriptor {
            name: STOCK_PRICES_STREAM.to_string(),
            supported_sync_modes: vec![SyncMode::FullRefresh],
            json_schema: StreamSchema { properties },
        }],
    }
}

/// The configuration-schema document advertised by `spec`.
pub fn connector_spec() -> Result<serde_json::Value, serde_json::Error> {
    serde_json::from_str(CONNECTOR_SPEC)
}
