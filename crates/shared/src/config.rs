//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Entity store configuration.
    pub store: StoreConfig,
    /// Posting engine configuration.
    #[serde(default)]
    pub posting: PostingConfig,
}

/// Entity store configuration.
///
/// The engine talks to a remote document store; the transport itself is
/// owned by the excluded entity-API layer.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the entity-storage API.
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Posting engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// Maximum retries for a compare-and-swap balance update.
    #[serde(default = "default_balance_retries")]
    pub balance_update_retries: u32,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            balance_update_retries: default_balance_retries(),
        }
    }
}

fn default_balance_retries() -> u32 {
    5
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("QUILL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
