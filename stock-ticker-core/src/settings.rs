//! Connector settings: operator-level overrides stored as TOML.
//!
//! ```toml
//! api_base_url = "https://api.polygon.io"
//! result_limit = 120
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use crate::config::{read_document, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_BASE_URL: &str = "https://api.polygon.io";
pub const DEFAULT_RESULT_LIMIT: u32 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectorSettings {
    /// Scheme and host of the market-data API, without a trailing path.
    pub api_base_url: String,
    /// Maximum number of daily bars requested per query.
    pub result_limit: u32,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

impl ConnectorSettings {
    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let (resolved, content) = read_document(path)?;
        let settings: Self = toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: resolved,
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Settings from `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.result_limit == 0 {
            return Err(ConfigError::InvalidSettings(
                "result_limit must be at least 1".into(),
            ));
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidSettings(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        Ok(())
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
