use utoipa::OpenApi;
use crate::{config, handlers, models};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_controllers,
        handlers::get_bridge_lights,
        handlers::get_bridge_light,
        handlers::get_light_state,
        handlers::put_light_state,
        handlers::reload,
        handlers::health,
    ),
    components(
        schemas(
            models::Controller,
            models::Light,
            models::LightState,
            config::Connection,
            handlers::ReloadSummary,
            handlers::Health,
        )
    )
)]
pub struct ApiDoc;
