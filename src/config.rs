//! Client configuration

use crate::error::SolrResult;
use crate::protocol::Protocol;
use serde::{Deserialize, Serialize};

/// Settings shared by every search and update of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolrConfig {
    /// Wire protocol spoken by the engine
    #[serde(default)]
    pub protocol: Protocol,

    /// Request handler for searches
    #[serde(default = "default_select_handler")]
    pub select_handler: String,

    /// Request handler for updates
    #[serde(default = "default_update_handler")]
    pub update_handler: String,

    /// Page size used when a search carries no limit
    #[serde(default)]
    pub default_limit: Option<u64>,

    /// Ask the engine to commit added documents within this many milliseconds
    #[serde(default)]
    pub commit_within_ms: Option<u64>,
}

impl SolrConfig {
    pub fn builder() -> SolrConfigBuilder {
        SolrConfigBuilder::new()
    }

    /// Load configuration from the embedded defaults, an optional file and the environment
    pub fn load() -> SolrResult<Self> {
        let config_path =
            std::env::var("SOLR_CONFIG_PATH").unwrap_or_else(|_| "config/solr.toml".to_string());

        let config: SolrConfig = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: SOLR__)
            .add_source(
                config::Environment::with_prefix("SOLR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        tracing::debug!(config_path = %config_path, "Loaded configuration");
        Ok(config)
    }
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::default(),
            select_handler: default_select_handler(),
            update_handler: default_update_handler(),
            default_limit: None,
            commit_within_ms: None,
        }
    }
}

fn default_select_handler() -> String {
    "/select".to_string()
}

fn default_update_handler() -> String {
    "/update".to_string()
}

/// Builder for SolrConfig
#[derive(Debug, Clone, Default)]
pub struct SolrConfigBuilder {
    config: SolrConfig,
}

impl SolrConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.config.protocol = protocol;
        self
    }

    pub fn select_handler(mut self, handler: impl Into<String>) -> Self {
        self.config.select_handler = handler.into();
        self
    }

    pub fn update_handler(mut self, handler: impl Into<String>) -> Self {
        self.config.update_handler = handler.into();
        self
    }

    pub fn default_limit(mut self, limit: u64) -> Self {
        self.config.default_limit = Some(limit);
        self
    }

    pub fn commit_within_ms(mut self, ms: u64) -> Self {
        self.config.commit_within_ms = Some(ms);
        self
    }

    pub fn build(self) -> SolrConfig {
        self.config
    }
}
