//! Security key ceremonies over CBOR.
//!
//! Ceremony state is single-use: it is stored by `begin`, taken out of the
//! session before its matching `complete` decides an outcome, and is never
//! left behind on success or failure, so a challenge cannot be replayed.

use axum::{
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, warn};

use super::{finish, found, require_platform_admin};
use crate::admin::error::PageError;
use crate::admin::session::load_or_create;
use crate::admin::state::AppState;
use crate::platform::{AuthType, NewCredential, User, WebAuthnCredential};
use crate::session::SessionData;
use crate::webauthn::{CeremonyError, CeremonyUser, transport};

const NO_REGISTRATION_IN_PROGRESS: &str = "No registration in progress";
const NO_AUTHENTICATION_IN_PROGRESS: &str = "No authentication in progress";
const POST_LOGIN_DESTINATION: &str = "/services";
const DEFAULT_KEY_NAME: &str = "Security key";
const LOGIN_EVENT: &str = "successful_login";

fn cbor_response(status: StatusCode, value: &impl Serialize) -> Result<Response, PageError> {
    let body = transport::encode(value).map_err(|err| PageError::Internal(err.into()))?;
    Ok((status, [(CONTENT_TYPE, transport::CBOR_CONTENT_TYPE)], body).into_response())
}

fn decoded_credentials(credentials: &[WebAuthnCredential]) -> Vec<Vec<u8>> {
    credentials
        .iter()
        .filter_map(|credential| credential.decoded_data().ok())
        .collect()
}

pub async fn begin_register(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, PageError> {
    let (token, mut session, fresh) = load_or_create(&state, &headers).await;
    let user = require_platform_admin(&state, &session).await?;

    let credentials = state.platform().get_credentials_for_user(user.id).await?;
    let ceremony_user = CeremonyUser {
        id: user.id,
        name: user.email_address.clone(),
    };
    let (options, ceremony_state) = state
        .ceremony()
        .build_registration_options(&ceremony_user, &decoded_credentials(&credentials))
        .map_err(|err| PageError::Internal(err.into()))?;

    session.webauthn_registration_state = Some(ceremony_state);

    let response = cbor_response(StatusCode::OK, &options)?;
    Ok(finish(&state, &token, session, fresh, response).await)
}

pub async fn complete_register(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, PageError> {
    let (token, mut session, fresh) = load_or_create(&state, &headers).await;
    let user = require_platform_admin(&state, &session).await?;

    let Some(ceremony_state) = session.webauthn_registration_state.take() else {
        let response = cbor_response(StatusCode::BAD_REQUEST, &NO_REGISTRATION_IN_PROGRESS)?;
        return Ok(finish(&state, &token, session, fresh, response).await);
    };

    let verified = transport::decode::<Value>(&body)
        .map_err(|err| CeremonyError::Payload(err.to_string()))
        .and_then(|response| state.ceremony().verify_registration(&ceremony_state, &response));

    let response = match verified {
        Ok(key) => {
            let credential = NewCredential::from_engine_data(DEFAULT_KEY_NAME, &key.credential_data);
            match state
                .platform()
                .create_credential_for_user(user.id, &credential)
                .await
            {
                Ok(()) => StatusCode::OK.into_response(),
                Err(err) => {
                    error!("Failed to store security key: {err}");
                    PageError::from(err).into_response()
                }
            }
        }
        Err(err) => {
            warn!("Security key registration failed: {err}");
            cbor_response(StatusCode::BAD_REQUEST, &err.to_string())?
        }
    };

    Ok(finish(&state, &token, session, fresh, response).await)
}

pub async fn begin_authentication(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, PageError> {
    let (token, mut session, fresh) = load_or_create(&state, &headers).await;
    let user = require_pending_webauthn_user(&state, &session).await?;

    let credentials = state.platform().get_credentials_for_user(user.id).await?;
    let (options, ceremony_state) = state
        .ceremony()
        .build_authentication_options(&decoded_credentials(&credentials))
        .map_err(|err| match err {
            CeremonyError::UnknownCredential => PageError::Forbidden,
            other => PageError::Internal(other.into()),
        })?;

    session.webauthn_authentication_state = Some(ceremony_state);

    let response = cbor_response(StatusCode::OK, &options)?;
    Ok(finish(&state, &token, session, fresh, response).await)
}

pub async fn complete_authentication(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, PageError> {
    let (token, mut session, fresh) = load_or_create(&state, &headers).await;
    let user = require_pending_webauthn_user(&state, &session).await?;
    let credentials = state.platform().get_credentials_for_user(user.id).await?;

    let Some(ceremony_state) = session.webauthn_authentication_state.take() else {
        let response = cbor_response(StatusCode::BAD_REQUEST, &NO_AUTHENTICATION_IN_PROGRESS)?;
        return Ok(finish(&state, &token, session, fresh, response).await);
    };

    let verified = transport::decode::<Value>(&body)
        .map_err(|err| CeremonyError::Payload(err.to_string()))
        .and_then(|response| {
            state.ceremony().verify_authentication(
                &ceremony_state,
                &decoded_credentials(&credentials),
                &response,
            )
        });

    let response = match verified {
        Ok(_) => {
            session.user_id = Some(user.id);
            session.user_details = None;
            if let Err(err) = state
                .platform()
                .record_event(LOGIN_EVENT, json!({ "user_id": user.id }))
                .await
            {
                error!("Failed to record login event: {err}");
            }
            found(POST_LOGIN_DESTINATION)
        }
        Err(err) => {
            warn!("Security key authentication failed: {err}");
            // The pending user stays in place so they can try again.
            session.user_id = None;
            StatusCode::FORBIDDEN.into_response()
        }
    };

    Ok(finish(&state, &token, session, fresh, response).await)
}

/// The authentication ceremony only applies to a user who has already been
/// identified and whose account uses a security key as its second factor.
async fn require_pending_webauthn_user(
    state: &AppState,
    session: &SessionData,
) -> Result<User, PageError> {
    let Some(pending) = &session.user_details else {
        return Err(PageError::Forbidden);
    };
    let user = state.platform().get_user(pending.id).await?;
    if !user.platform_admin || user.auth_type != AuthType::WebauthnAuth {
        return Err(PageError::Forbidden);
    }
    Ok(user)
}
