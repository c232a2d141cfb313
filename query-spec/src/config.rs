//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: QUERY_SPEC_)
//! 2. Config file: ./query-spec.toml, or the path given to [`QueryConfig::load_from`]
//! 3. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sort::DEFAULT_SORT_FIELD;

/// Config file looked up by [`QueryConfig::load`]
pub const CONFIG_FILE: &str = "query-spec.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "QUERY_SPEC_";

/// Query building configuration
///
/// Each [`crate::QuerySpecBuilder`] is constructed from one of these, so two
/// endpoints can use different defaults side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Field ordered by (descending) when a request has no usable sort
    #[serde(default = "default_sort_field")]
    pub default_sort_field: String,

    /// Page size used when a request has no usable page size
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sort_field() -> String {
    DEFAULT_SORT_FIELD.to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_sort_field: default_sort_field(),
            default_page_size: default_page_size(),
            log_level: default_log_level(),
        }
    }
}

impl QueryConfig {
    /// Load configuration from ./query-spec.toml (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment variables
    /// still apply.
    pub fn load_from(path: &str) -> Result<Self> {
        tracing::debug!(path, "Loading query configuration");

        let config: Self = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(QueryConfig::default()))
            // Load from config file (if exists)
            .merge(Toml::file(path))
            // Override with environment variables
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;

        if config.default_sort_field.trim().is_empty() {
            return Err(Error::from(figment::Error::from(
                "default_sort_field must not be blank".to_string(),
            )));
        }

        Ok(config)
    }

    /// Override the default sort field
    #[must_use]
    pub fn with_default_sort_field(mut self, field: impl Into<String>) -> Self {
        self.default_sort_field = field.into();
        self
    }

    /// Override the default page size
    #[must_use]
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }
}
