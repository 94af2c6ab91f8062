// handlers.rs

use crate::{
    error::AppError,
    models::{AppState, Controller, Light, LightState},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadSummary {
    pub controllers: usize,
    pub failed: Vec<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    pub status: String,
    pub built: bool,
    pub controllers: usize,
}

#[utoipa::path(
    get,
    path = "/api/controllers",
    responses((status = 200, description = "Every cached controller, registered or not", body = Vec<Controller>))
)]
pub async fn list_controllers(State(state): State<Arc<AppState>>) -> Json<Vec<Controller>> {
    Json(state.cache.snapshot().await)
}

#[utoipa::path(
    get,
    path = "/api/{bridge}/lights",
    params(("bridge" = String, Path, description = "Human name of the bridge")),
    responses(
        (status = 200, description = "Lights of a registered bridge", body = Vec<Light>),
        (status = 400, description = "Bridge not present or not registered")
    )
)]
pub async fn get_bridge_lights(
    State(state): State<Arc<AppState>>,
    Path(bridge): Path<String>,
) -> Result<Json<Vec<Light>>, AppError> {
    Ok(Json(state.cache.lights(&bridge).await?))
}

#[utoipa::path(
    get,
    path = "/api/{bridge}/lights/{light_id}",
    params(
        ("bridge" = String, Path, description = "Human name of the bridge"),
        ("light_id" = String, Path, description = "Light id as assigned by the bridge")
    ),
    responses(
        (status = 200, description = "A single light", body = Light),
        (status = 400, description = "Bridge or light not present")
    )
)]
pub async fn get_bridge_light(
    State(state): State<Arc<AppState>>,
    Path((bridge, light_id)): Path<(String, String)>,
) -> Result<Json<Light>, AppError> {
    Ok(Json(state.cache.light(&bridge, &light_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/{bridge}/lights/{light_id}/state",
    params(
        ("bridge" = String, Path, description = "Human name of the bridge"),
        ("light_id" = String, Path, description = "Light id as assigned by the bridge")
    ),
    responses(
        (status = 200, description = "Freshly fetched light state", body = LightState),
        (status = 400, description = "Bridge or light not present")
    )
)]
pub async fn get_light_state(
    State(state): State<Arc<AppState>>,
    Path((bridge, light_id)): Path<(String, String)>,
) -> Result<Json<LightState>, AppError> {
    Ok(Json(state.cache.light_state(&bridge, &light_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/{bridge}/lights/{light_id}/state",
    params(
        ("bridge" = String, Path, description = "Human name of the bridge"),
        ("light_id" = String, Path, description = "Light id as assigned by the bridge")
    ),
    request_body = LightState,
    responses(
        (status = 200, description = "State written", body = String),
        (status = 400, description = "Bridge or light not present"),
        (status = 500, description = "Malformed body or bridge failure")
    )
)]
pub async fn put_light_state(
    State(state): State<Arc<AppState>>,
    Path((bridge, light_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let new_state: LightState = serde_json::from_slice(&body)?;
    state
        .cache
        .set_light_state(&bridge, &light_id, new_state)
        .await?;
    info!(%bridge, %light_id, ?new_state, "light state written");
    Ok("Success")
}

#[utoipa::path(
    post,
    path = "/api/reload",
    responses(
        (status = 200, description = "Configuration re-fetched and cache rebuilt", body = ReloadSummary),
        (status = 500, description = "Configuration service unavailable")
    )
)]
pub async fn reload(State(state): State<Arc<AppState>>) -> Result<Json<ReloadSummary>, AppError> {
    state.config.reload(&state.config_service).await?;

    let failed = match state.cache.rebuild().await {
        Ok(_) => Vec::new(),
        Err(AppError::RebuildFailed { indices }) => indices,
        Err(e) => return Err(e),
    };

    Ok(Json(ReloadSummary {
        controllers: state.cache.len().await,
        failed,
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = Health))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        built: state.cache.is_built().await,
        controllers: state.cache.len().await,
    })
}
