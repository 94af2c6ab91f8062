// config/mod.rs
mod bridges;

pub use bridges::{BridgeConfig, ConfigService, Connection, SharedConfig};

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Source(#[from] config::ConfigError),
    #[error("Invalid settings: {0}")]
    Invalid(#[from] ValidationErrors),
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub server: ServerSettings,
    #[validate(nested)]
    pub services: ServiceSettings,
    #[validate(nested)]
    pub refresh: RefreshSettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerSettings {
    #[validate(length(min = 1))]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServiceSettings {
    #[validate(url)]
    pub config_url: String,
    #[validate(url)]
    pub registry_url: String,
    #[validate(length(min = 1))]
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshSettings {
    #[validate(range(min = 1))]
    pub interval_secs: u64,
    /// Run a full rebuild on every tick instead of refreshing the
    /// controllers that already exist.
    pub full_rebuild: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub port: u16,
}

impl Settings {
    pub fn new() -> Result<Self, SettingsError> {
        Self::load(config::File::with_name("config/config").required(false))
    }

    fn load<S>(source: S) -> Result<Self, SettingsError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings: Settings = Config::builder()
            .set_default("server.address", "0.0.0.0:4000")?
            .set_default("services.config_url", "http://localhost:8080")?
            .set_default("services.registry_url", "http://localhost:5000")?
            .set_default("services.service_name", "hue-controller")?
            .set_default("refresh.interval_secs", 3)?
            .set_default("refresh.full_rebuild", false)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.port", 9000)?
            .add_source(source)
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}
