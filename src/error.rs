// error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid connection: {0}")]
    InvalidConnection(String),
    #[error("Bridge rejected the request with status {status}")]
    BridgeRejected { status: u16 },
    #[error("Bridge {bridge} is not registered")]
    NotRegistered { bridge: String },
    #[error("Requested controller not present or registered: {0}")]
    ControllerNotFound(String),
    #[error("Requested light {light_id} not present on {bridge}")]
    LightNotFound { bridge: String, light_id: String },
    #[error("Failed connections at indices {indices:?}")]
    RebuildFailed { indices: Vec<usize> },
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidConnection(_)
            | AppError::NotRegistered { .. }
            | AppError::ControllerNotFound(_)
            | AppError::LightNotFound { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
