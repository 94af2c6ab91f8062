// cache/mod.rs
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::SharedConfig,
    devices::BridgeApi,
    error::AppError,
    metrics,
    models::{Controller, Light, LightState},
    registry::RegistryApi,
};

#[derive(Debug, Default)]
struct CacheState {
    controllers: Vec<Controller>,
    built: bool,
}

impl CacheState {
    fn registered(&self, name: &str) -> Result<&Controller, AppError> {
        self.controllers
            .iter()
            .find(|c| c.registered && c.human_name == name)
            .ok_or_else(|| AppError::ControllerNotFound(name.to_string()))
    }

    fn registered_mut(&mut self, name: &str) -> Result<&mut Controller, AppError> {
        self.controllers
            .iter_mut()
            .find(|c| c.registered && c.human_name == name)
            .ok_or_else(|| AppError::ControllerNotFound(name.to_string()))
    }
}

fn light_of<'a>(controller: &'a Controller, light_id: &str) -> Result<&'a Light, AppError> {
    controller
        .light(light_id)
        .ok_or_else(|| AppError::LightNotFound {
            bridge: controller.human_name.clone(),
            light_id: light_id.to_string(),
        })
}

/// One controller per configured bridge, behind a single lock.
///
/// Every read and every refresh holds the lock for its whole duration,
/// including downstream calls, so readers never observe a half-built list.
pub struct ControllerCache {
    config: Arc<SharedConfig>,
    bridge: Arc<dyn BridgeApi>,
    registry: Arc<dyn RegistryApi>,
    state: Mutex<CacheState>,
}

impl ControllerCache {
    pub fn new(
        config: Arc<SharedConfig>,
        bridge: Arc<dyn BridgeApi>,
        registry: Arc<dyn RegistryApi>,
    ) -> Self {
        Self {
            config,
            bridge,
            registry,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Build a fresh controller list from the current configuration and
    /// swap it in. Connections that fail validation or whose lights cannot
    /// be fetched are left out and reported by index.
    pub async fn rebuild(&self) -> Result<usize, AppError> {
        let config = self.config.lock().await;
        let mut state = self.state.lock().await;

        let mut controllers = Vec::with_capacity(config.connections.len());
        let mut failed = Vec::new();
        for (index, connection) in config.connections.iter().enumerate() {
            let mut controller = match Controller::new(connection.clone()) {
                Ok(controller) => controller,
                Err(e) => {
                    warn!(index, error = %e, "skipping connection");
                    failed.push(index);
                    continue;
                }
            };

            if let Err(e) = self.refresh(&mut controller).await {
                warn!(index, bridge = %connection.bridge, error = %e, "controller refresh failed");
                failed.push(index);
                continue;
            }
            controllers.push(controller);
        }

        state.controllers = controllers;
        state.built = true;

        let count = state.controllers.len();
        metrics::record_rebuild(failed.is_empty(), count);
        info!(controllers = count, failed = failed.len(), "controller cache rebuilt");

        if failed.is_empty() {
            Ok(count)
        } else {
            Err(AppError::RebuildFailed { indices: failed })
        }
    }

    /// Re-fetch lights and registry details for one controller.
    ///
    /// Only a light fetch failure is returned. A registry failure marks the
    /// controller unregistered and is otherwise swallowed.
    pub async fn refresh(&self, controller: &mut Controller) -> Result<(), AppError> {
        let lights = match self.bridge.list_lights(&controller.connection).await {
            Ok(lights) => lights,
            Err(e) => {
                metrics::record_refresh(false);
                return Err(e);
            }
        };
        controller.lights = lights;
        controller.refreshed_at = Some(Utc::now());
        metrics::record_refresh(true);

        match self.registry.lookup(&controller.connection).await {
            Ok(record) => {
                controller.human_name = record.human_name;
                controller.registered = true;
            }
            Err(e) => {
                warn!(bridge = %controller.connection.bridge, error = %e, "registry lookup failed");
                controller.human_name.clear();
                controller.registered = false;
            }
        }

        Ok(())
    }

    /// Refresh every cached controller in place, keeping stale data for the
    /// ones that fail. Returns the number of failures.
    pub async fn refresh_all(&self) -> usize {
        let mut state = self.state.lock().await;
        let mut failures = 0;
        for controller in &mut state.controllers {
            if let Err(e) = self.refresh(controller).await {
                warn!(bridge = %controller.connection.bridge, error = %e, "controller refresh failed");
                failures += 1;
            }
        }
        failures
    }

    pub async fn tick(&self, full_rebuild: bool) {
        if full_rebuild || !self.is_built().await {
            if let Err(e) = self.rebuild().await {
                warn!(error = %e, "periodic rebuild incomplete");
            }
        } else {
            let failures = self.refresh_all().await;
            debug!(failures, "periodic refresh done");
        }
    }

    pub async fn is_built(&self) -> bool {
        self.state.lock().await.built
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.controllers.len()
    }

    pub async fn snapshot(&self) -> Vec<Controller> {
        self.state.lock().await.controllers.clone()
    }

    pub async fn lights(&self, bridge: &str) -> Result<Vec<Light>, AppError> {
        let state = self.state.lock().await;
        Ok(state.registered(bridge)?.lights.clone())
    }

    pub async fn light(&self, bridge: &str, light_id: &str) -> Result<Light, AppError> {
        let state = self.state.lock().await;
        light_of(state.registered(bridge)?, light_id).cloned()
    }

    pub async fn light_state(&self, bridge: &str, light_id: &str) -> Result<LightState, AppError> {
        let mut state = self.state.lock().await;
        let controller = state.registered_mut(bridge)?;
        if let Err(e) = self.refresh(controller).await {
            warn!(%bridge, error = %e, "serving cached light state");
        }
        Ok(light_of(controller, light_id)?.state)
    }

    /// Write a light's state to its bridge, then refresh the controller so
    /// the cache reflects the write.
    pub async fn set_light_state(
        &self,
        bridge: &str,
        light_id: &str,
        new_state: LightState,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        let controller = state.registered_mut(bridge)?;
        light_of(controller, light_id)?;

        let written = self
            .bridge
            .set_light_state(&controller.connection, light_id, &new_state)
            .await;
        metrics::record_light_write(written.is_ok());
        written?;

        if let Err(e) = self.refresh(controller).await {
            warn!(%bridge, error = %e, "refresh after write failed");
        }
        Ok(())
    }
}
