//! Error taxonomy for page handlers.
//!
//! NotFound and Forbidden are terminal responses with no recovery.
//! Validation problems never reach this type; they re-render the form
//! inline. Anything unexpected is logged and reported as a 500 without
//! leaking details.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::platform::PlatformError;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("page not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<PlatformError> for PageError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::NotFound => Self::NotFound,
            PlatformError::Forbidden => Self::Forbidden,
            other => Self::Internal(other.into()),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Page not found".to_string()),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission to view this page".to_string(),
            ),
            Self::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            Self::Internal(err) => {
                error!("request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Sorry, something went wrong".to_string(),
                )
            }
        };
        (status, Html(message)).into_response()
    }
}
