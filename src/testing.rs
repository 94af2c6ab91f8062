// testing.rs
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::{
    config::{BridgeConfig, Connection},
    devices::BridgeApi,
    error::AppError,
    models::{Light, LightState, RegistryRecord},
    registry::RegistryApi,
};

pub fn config_of(connections: Vec<Connection>) -> BridgeConfig {
    BridgeConfig {
        connections,
        loaded: true,
    }
}

pub fn light(id: &str, on: bool, brightness: u8) -> Light {
    Light {
        id: id.to_string(),
        state: LightState { on, brightness },
    }
}

// A bridge with no entry behaves as unreachable.
#[derive(Default)]
pub struct FakeBridge {
    lights: Mutex<HashMap<String, Vec<Light>>>,
    delay: Mutex<Option<Duration>>,
    list_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl FakeBridge {
    pub fn put_bridge(&self, bridge: &str, lights: Vec<Light>) {
        self.lights.lock().unwrap().insert(bridge.to_string(), lights);
    }

    pub fn unplug(&self, bridge: &str) {
        self.lights.lock().unwrap().remove(bridge);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BridgeApi for FakeBridge {
    async fn list_lights(&self, connection: &Connection) -> Result<Vec<Light>, AppError> {
        connection.endpoint()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.lights
            .lock()
            .unwrap()
            .get(&connection.bridge)
            .cloned()
            .ok_or(AppError::BridgeRejected { status: 503 })
    }

    async fn set_light_state(
        &self,
        connection: &Connection,
        light_id: &str,
        state: &LightState,
    ) -> Result<(), AppError> {
        connection.endpoint()?;
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut bridges = self.lights.lock().unwrap();
        let light = bridges
            .get_mut(&connection.bridge)
            .and_then(|lights| lights.iter_mut().find(|l| l.id == light_id))
            .ok_or(AppError::BridgeRejected { status: 404 })?;
        light.state = *state;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    names: Mutex<HashMap<String, String>>,
}

impl FakeRegistry {
    pub fn register(&self, bridge: &str, name: &str) {
        self.names
            .lock()
            .unwrap()
            .insert(bridge.to_string(), name.to_string());
    }

    pub fn forget(&self, bridge: &str) {
        self.names.lock().unwrap().remove(bridge);
    }
}

#[async_trait]
impl RegistryApi for FakeRegistry {
    async fn lookup(&self, connection: &Connection) -> Result<RegistryRecord, AppError> {
        self.names
            .lock()
            .unwrap()
            .get(&connection.bridge)
            .map(|name| RegistryRecord {
                human_name: name.clone(),
            })
            .ok_or_else(|| AppError::NotRegistered {
                bridge: connection.bridge.clone(),
            })
    }
}
