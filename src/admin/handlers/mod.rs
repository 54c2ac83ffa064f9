//! Route handlers for the admin front-end.

pub mod health;
pub mod invites;
pub mod root;
pub mod tour;
pub mod webauthn;


use axum::http::{
    StatusCode,
    header::{LOCATION, SET_COOKIE},
};
use axum::response::{IntoResponse, Response};
use regex::Regex;

use super::error::PageError;
use super::session::session_cookie;
use super::state::AppState;
use crate::platform::User;
use crate::session::SessionData;

/// Lightweight email sanity check before calling the platform API.
pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Plain 302 redirect.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// Resolve the logged-in user, or fail with Forbidden.
pub(crate) async fn require_user(
    state: &AppState,
    session: &SessionData,
) -> Result<User, PageError> {
    let Some(user_id) = session.user_id else {
        return Err(PageError::Forbidden);
    };
    Ok(state.platform().get_user(user_id).await?)
}

pub(crate) async fn require_platform_admin(
    state: &AppState,
    session: &SessionData,
) -> Result<User, PageError> {
    let user = require_user(state, session).await?;
    if !user.platform_admin {
        return Err(PageError::Forbidden);
    }
    Ok(user)
}

/// Persist the session and attach the cookie when it was created during
/// this request.
pub(crate) async fn finish(
    state: &AppState,
    token: &str,
    session: SessionData,
    fresh: bool,
    mut response: Response,
) -> Response {
    state.sessions().put(token, session).await;
    if fresh && let Ok(cookie) = session_cookie(state.config(), token) {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}
