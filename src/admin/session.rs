//! Session cookie plumbing.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};

use super::state::{AdminConfig, AppState};
use crate::session::SessionData;

pub(crate) const SESSION_COOKIE_NAME: &str = "notify_admin_session";

/// Load the session for this request, creating one when the cookie is
/// missing or stale. Returns the token, a snapshot of the data, and
/// whether a `Set-Cookie` header is needed on the response.
pub(crate) async fn load_or_create(
    state: &AppState,
    headers: &HeaderMap,
) -> (String, SessionData, bool) {
    if let Some(token) = extract_session_token(headers)
        && let Some(data) = state.sessions().get(&token).await
    {
        return (token, data, false);
    }
    let token = state.sessions().create().await;
    (token, SessionData::default(), true)
}

pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

/// Build a `HttpOnly` cookie for the session token.
pub(crate) fn session_cookie(
    config: &AdminConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    // Only mark cookies secure when the front-end is served over HTTPS.
    let secure = config.session_cookie_secure();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
