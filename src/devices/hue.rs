// hue.rs
use async_trait::async_trait;
use reqwest::{StatusCode, header};
use std::collections::BTreeMap;
use tracing::debug;

use super::BridgeApi;
use crate::{
    config::Connection,
    error::AppError,
    models::{Light, LightState},
};

#[derive(Debug, Clone)]
pub struct HueBridgeClient {
    http: reqwest::Client,
}

impl HueBridgeClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

/// Decode a bridge `GET /lights` body. The bridge keys lights by id and
/// does not repeat the id inside each entry.
pub fn decode_lights(body: &[u8]) -> Result<Vec<Light>, AppError> {
    let lights: BTreeMap<String, Light> = serde_json::from_slice(body)?;
    Ok(lights
        .into_iter()
        .map(|(id, mut light)| {
            light.id = id;
            light
        })
        .collect())
}

#[async_trait]
impl BridgeApi for HueBridgeClient {
    async fn list_lights(&self, connection: &Connection) -> Result<Vec<Light>, AppError> {
        let url = format!("{}/lights", connection.endpoint()?);
        debug!(%url, "GET");

        let body = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?
            .bytes()
            .await?;

        decode_lights(&body)
    }

    async fn set_light_state(
        &self,
        connection: &Connection,
        light_id: &str,
        state: &LightState,
    ) -> Result<(), AppError> {
        let url = format!("{}/lights/{light_id}/state", connection.endpoint()?);
        debug!(%url, ?state, "PUT");

        let resp = self.http.put(&url).json(state).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(AppError::BridgeRejected {
                status: resp.status().as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, HueBridgeClient, Connection) {
        let server = MockServer::start().await;
        let bridge = server.address().to_string();
        let client = HueBridgeClient::new(reqwest::Client::new());
        (server, client, Connection::new(bridge, "alice"))
    }

    #[test]
    fn light_ids_come_from_mapping_keys() {
        let body = json!({
            "1": { "state": { "on": false, "bri": 10 } },
            "2": { "state": { "on": true, "bri": 255 } }
        });

        let mut lights = decode_lights(body.to_string().as_bytes()).unwrap();
        lights.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(
            lights,
            vec![
                Light {
                    id: "1".into(),
                    state: LightState {
                        on: false,
                        brightness: 10,
                    },
                },
                Light {
                    id: "2".into(),
                    state: LightState {
                        on: true,
                        brightness: 255,
                    },
                },
            ]
        );
    }

    #[test]
    fn embedded_light_id_is_overwritten_by_key() {
        let body = json!({ "3": { "light_id": "bogus", "state": { "on": true, "bri": 1 } } });
        let lights = decode_lights(body.to_string().as_bytes()).unwrap();
        assert_eq!(lights[0].id, "3");
    }

    #[test]
    fn entry_without_state_decodes_as_off() {
        let body = json!({
            "1": { "name": "plug" },
            "2": { "state": { "on": true, "bri": 255 } }
        });

        let lights = decode_lights(body.to_string().as_bytes()).unwrap();

        assert_eq!(lights.len(), 2);
        assert_eq!(lights[0].id, "1");
        assert_eq!(lights[0].state, LightState::default());
        assert!(lights[1].state.on);
    }

    #[test]
    fn bridge_error_array_is_a_decode_error() {
        let body = json!([{ "error": { "type": 1, "description": "unauthorized user" } }]);
        let err = decode_lights(body.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn list_lights_queries_the_user_endpoint() {
        let (server, client, conn) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/alice/lights"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "5": { "state": { "on": true, "bri": 128 }, "name": "Hall" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let lights = client.list_lights(&conn).await.unwrap();

        assert_eq!(
            lights,
            vec![Light {
                id: "5".into(),
                state: LightState {
                    on: true,
                    brightness: 128,
                },
            }]
        );
    }

    #[tokio::test]
    async fn invalid_connection_never_reaches_the_bridge() {
        let (server, client, _) = setup().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let conn = Connection::new(server.address().to_string(), "");
        let err = client.list_lights(&conn).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidConnection(_)), "got {err:?}");

        let err = client
            .set_light_state(&conn, "1", &LightState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidConnection(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn set_light_state_sends_whole_state() {
        let (server, client, conn) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/alice/lights/5/state"))
            .and(body_json(json!({ "on": true, "bri": 200 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "success": { "/lights/5/state/on": true } }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        client
            .set_light_state(
                &conn,
                "5",
                &LightState {
                    on: true,
                    brightness: 200,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_ok_status_is_rejected() {
        let (server, client, conn) = setup().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client
            .set_light_state(&conn, "9", &LightState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BridgeRejected { status: 404 }), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_bridge_is_a_transport_error() {
        let client = HueBridgeClient::new(reqwest::Client::new());
        let conn = Connection::new("127.0.0.1:1", "alice");

        let err = client.list_lights(&conn).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)), "got {err:?}");

        let err = client
            .set_light_state(&conn, "1", &LightState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)), "got {err:?}");
    }
}
