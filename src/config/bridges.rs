// config/bridges.rs
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

use super::ServiceSettings;
use crate::error::AppError;

/// Address and credential needed to reach one Hue bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Connection {
    #[validate(length(min = 1, message = "bridge not set for connection"))]
    pub bridge: String,
    #[validate(length(min = 1, message = "username not set for connection"))]
    pub username: String,
}

impl Connection {
    pub fn new(bridge: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            bridge: bridge.into(),
            username: username.into(),
        }
    }

    pub fn endpoint(&self) -> Result<String, AppError> {
        self.validate()
            .map_err(|e| AppError::InvalidConnection(e.to_string()))?;
        Ok(format!("http://{}/api/{}", self.bridge, self.username))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(skip)]
    pub loaded: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigService {
    http: reqwest::Client,
    url: String,
}

impl ConfigService {
    pub fn new(http: reqwest::Client, services: &ServiceSettings) -> Self {
        let base = services.config_url.trim_end_matches('/');
        Self {
            http,
            url: format!("{base}/getconfig/{}", services.service_name),
        }
    }

    pub async fn fetch(&self) -> Result<BridgeConfig, AppError> {
        debug!(url = %self.url, "fetching bridge configuration");
        let body = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .bytes()
            .await?;

        let mut config: BridgeConfig = serde_json::from_slice(&body)?;
        config.loaded = true;
        Ok(config)
    }
}

/// Process-wide bridge configuration behind its own lock.
///
/// Whenever both this lock and the controller cache lock are needed, this
/// one is taken first.
#[derive(Debug, Default)]
pub struct SharedConfig {
    inner: Mutex<BridgeConfig>,
}

impl SharedConfig {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            inner: Mutex::new(config),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, BridgeConfig> {
        self.inner.lock().await
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.lock().await.loaded
    }

    /// Fetch the configuration again and publish it. The previous
    /// configuration is left untouched when the fetch fails.
    pub async fn reload(&self, service: &ConfigService) -> Result<usize, AppError> {
        let fresh = service.fetch().await?;
        let count = fresh.connections.len();
        *self.inner.lock().await = fresh;
        info!(connections = count, "bridge configuration loaded");
        Ok(count)
    }
}
