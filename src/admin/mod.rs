//! HTTP surface of the admin front-end.

pub mod error;
pub(crate) mod handlers;
pub(crate) mod render;
pub(crate) mod session;
pub mod state;

use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
};
use secrecy::SecretString;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;

use self::state::{AdminConfig, AppState};
use crate::platform::HttpPlatformApi;
use crate::webauthn::SecurityKeyEngine;

/// Build the route table over shared state.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::health::health))
        .route(
            "/services/:service_id/tour/:template_id",
            get(handlers::tour::begin_tour),
        )
        .route(
            "/services/:service_id/tour/:template_id/:step",
            get(handlers::tour::tour_step).post(handlers::tour::tour_step),
        )
        .route(
            "/services/:service_id/send/:template_id/check",
            get(handlers::tour::check_notification),
        )
        .route(
            "/services/:service_id/users/invite",
            get(handlers::invites::invite_user).post(handlers::invites::invite_user),
        )
        .route(
            "/webauthn/register/begin",
            get(handlers::webauthn::begin_register),
        )
        .route(
            "/webauthn/register/complete",
            post(handlers::webauthn::complete_register),
        )
        .route(
            "/webauthn/authenticate/begin",
            get(handlers::webauthn::begin_authentication),
        )
        .route(
            "/webauthn/authenticate/complete",
            post(handlers::webauthn::complete_authentication),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if the platform client, ceremony engine or listener cannot
/// be set up
pub async fn new(port: u16, config: AdminConfig, api_token: SecretString) -> Result<()> {
    let platform = HttpPlatformApi::new(config.api_base_url(), api_token)
        .context("Failed to build platform API client")?;
    let ceremony = SecurityKeyEngine::new(config.rp_id(), config.rp_origin(), config.rp_name())
        .context("Failed to build WebAuthn engine")?;
    let state = Arc::new(AppState::new(config, Arc::new(platform), Arc::new(ceremony)));

    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
