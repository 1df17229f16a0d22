//! Input documents: user config, configured catalog, and sync state.
//!
//! Paths are resolved against the process's current working directory (never
//! the executable's location), read in full, and parsed into typed structures.
//! A missing file or a document of the wrong shape is a [`ConfigError`].
//!
//! Field *presence* in the user config is not enforced here: each
//! operation decides how to report missing credentials.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading input documents and connector settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed settings in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Resolve `path` to an absolute location.
///
/// Absolute paths are returned unchanged; relative ones are joined onto the
/// current working directory.
pub fn resolve_path(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::WorkingDirectory)?;
    Ok(cwd.join(path))
}

/// Read the file at `path` into a string, resolving it first.
pub fn read_document(path: &Path) -> Result<(PathBuf, String), ConfigError> {
    let resolved = resolve_path(path)?;
    let content = std::fs::read_to_string(&resolved).map_err(|source| ConfigError::Io {
        path: resolved.clone(),
        source,
    })?;
    Ok((resolved, content))
}

/// Load and parse a JSON document into `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let (resolved, content) = read_document(path)?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: resolved,
        source,
    })
}

/// User-supplied connector configuration.
///
/// Both fields are optional at the parsing stage so that a missing credential
/// surfaces as an operation-level failure rather than a parse error. A field of
/// the wrong JSON type is still rejected at parse time.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub stock_ticker: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl SourceConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    /// Both credentials, if present and non-blank.
    pub fn credentials(&self) -> Option<Credentials<'_>> {
        let stock_ticker = non_blank(self.stock_ticker.as_deref())?;
        let api_key = non_blank(self.api_key.as_deref())?;
        Some(Credentials {
            stock_ticker,
            api_key,
        })
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("stock_ticker", &self.stock_ticker)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validated credentials borrowed from a [`SourceConfig`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub stock_ticker: &'a str,
    pub api_key: &'a str,
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("stock_ticker", &self.stock_ticker)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Catalog selected by the orchestrator for a `read`.
///
/// Extra keys on each entry (e.g. `destination_sync_mode`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCatalog {
    pub streams: Vec<ConfiguredStream>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    pub stream: StreamRef,
    pub sync_mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRef {
    pub name: String,
}

impl SelectedCatalog {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    /// First configured entry for the stream named `name`.
    pub fn find(&self, name: &str) -> Option<&ConfiguredStream> {
        self.streams.iter().find(|s| s.stream.name == name)
    }
}

/// Load a sync-state document. Its contents are not interpreted.
pub fn load_state(path: &Path) -> Result<serde_json::Value, ConfigError> {
    load_json(path)
}
