use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::cache::ControllerCache;
use crate::config::{ConfigService, Connection, SharedConfig};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LightState {
    #[serde(default)]
    pub on: bool,
    #[serde(default, rename = "bri")]
    pub brightness: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Light {
    /// Assigned from the key of the bridge's lights mapping.
    #[serde(default, rename = "light_id")]
    pub id: String,
    #[serde(default)]
    pub state: LightState,
}

/// In-memory proxy for one bridge: its lights plus registry metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Controller {
    pub connection: Connection,
    pub lights: Vec<Light>,
    pub registered: bool,
    pub human_name: String,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Controller {
    pub fn new(connection: Connection) -> Result<Self, AppError> {
        connection
            .validate()
            .map_err(|e| AppError::InvalidConnection(e.to_string()))?;

        Ok(Self {
            connection,
            lights: Vec::new(),
            registered: false,
            human_name: String::new(),
            refreshed_at: None,
        })
    }

    pub fn light(&self, id: &str) -> Option<&Light> {
        self.lights.iter().find(|l| l.id == id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryResponse {
    pub data: RegistryRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryRecord {
    #[serde(default, rename = "device_name")]
    pub human_name: String,
}

pub struct AppState {
    pub cache: Arc<ControllerCache>,
    pub config: Arc<SharedConfig>,
    pub config_service: ConfigService,
}

impl AppState {
    pub fn new(
        cache: Arc<ControllerCache>,
        config: Arc<SharedConfig>,
        config_service: ConfigService,
    ) -> Self {
        Self {
            cache,
            config,
            config_service,
        }
    }
}
