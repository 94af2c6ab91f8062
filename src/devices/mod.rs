// devices/mod.rs
mod hue;
pub use hue::{HueBridgeClient, decode_lights};

use crate::{
    config::Connection,
    error::AppError,
    models::{Light, LightState},
};

/// Light operations against a single bridge.
#[async_trait::async_trait]
pub trait BridgeApi: Send + Sync {
    async fn list_lights(&self, connection: &Connection) -> Result<Vec<Light>, AppError>;

    async fn set_light_state(
        &self,
        connection: &Connection,
        light_id: &str,
        state: &LightState,
    ) -> Result<(), AppError>;
}
