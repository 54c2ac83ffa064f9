use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use crate::GIT_COMMIT_HASH;
use crate::admin::state::AppState;

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    platform_api: String,
}

// axum handler for health
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let platform_ok = match state.platform().status().await {
        Ok(()) => {
            debug!("Platform API is healthy");
            true
        }
        Err(error) => {
            error!("Platform API status check failed: {}", error);
            false
        }
    };

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        platform_api: if platform_ok {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    let status = if platform_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(health))
}
