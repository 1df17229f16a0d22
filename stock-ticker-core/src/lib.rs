//! Stock Ticker Core: wire protocol, input documents, and market-data access.
//!
//! This crate contains the building blocks of the connector:
//! - Envelope types and the newline-delimited JSON writer
//! - Input document loading (config, configured catalog, state) and settings
//! - The static stream catalog and connector spec
//! - Clock capability and query window construction
//! - Market-data provider trait and the Polygon.io implementation

pub mod catalog;
pub mod clock;
pub mod config;
pub mod envelope;
pub mod polygon;
pub mod provider;
pub mod record;
pub mod settings;
pub mod window;

pub use catalog::{discover, CatalogDescriptor, STOCK_PRICES_STREAM};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, Credentials, SelectedCatalog, SourceConfig};
pub use envelope::{ConnectionStatus, Envelope, EnvelopeWriter, Status};
pub use polygon::PolygonClient;
pub use provider::{DailyClose, MarketDataProvider, UpstreamError};
pub use record::PriceRecord;
pub use settings::ConnectorSettings;
pub use window::QueryWindow;
