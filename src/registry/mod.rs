// registry/mod.rs
use async_trait::async_trait;
use reqwest::{StatusCode, header};
use tracing::debug;

use crate::{
    config::Connection,
    error::AppError,
    models::{RegistryRecord, RegistryResponse},
};

#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn lookup(&self, connection: &Connection) -> Result<RegistryRecord, AppError>;
}

#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    search_url: String,
}

impl RegistryClient {
    pub fn new(http: reqwest::Client, registry_url: &str) -> Self {
        Self {
            http,
            search_url: format!("{}/util/search", registry_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn lookup(&self, connection: &Connection) -> Result<RegistryRecord, AppError> {
        debug!(bridge = %connection.bridge, "registry lookup");
        let resp = self
            .http
            .get(&self.search_url)
            .query(&[("controller_gateway", connection.bridge.as_str())])
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(AppError::NotRegistered {
                bridge: connection.bridge.clone(),
            });
        }

        let body = resp.bytes().await?;
        let rsp: RegistryResponse = serde_json::from_slice(&body)?;
        Ok(rsp.data)
    }
}
