// routes.rs
use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{docs::ApiDoc, handlers::*, models::AppState};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::permanent("/docs/") }))
        .route("/health", get(health))
        .route("/api/controllers", get(list_controllers))
        .route("/api/reload", post(reload))
        .route("/api/{bridge}/lights", get(get_bridge_lights))
        .route("/api/{bridge}/lights/{light_id}", get(get_bridge_light))
        .route(
            "/api/{bridge}/lights/{light_id}/state",
            get(get_light_state).put(put_light_state),
        )
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
