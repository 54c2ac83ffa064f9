//! Inviting team members to a service.

use axum::{
    Form,
    extract::{Extension, Path},
    http::{HeaderMap, Method},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{finish, found, require_user, valid_email};
use crate::admin::error::PageError;
use crate::admin::render;
use crate::admin::session::load_or_create;
use crate::admin::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InviteForm {
    pub email_address: String,
    #[serde(default)]
    pub permissions: String,
}

pub async fn invite_user(
    Path(service_id): Path<Uuid>,
    method: Method,
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
    form: Option<Form<InviteForm>>,
) -> Result<Response, PageError> {
    let (token, session, fresh) = load_or_create(&state, &headers).await;
    let user = require_user(&state, &session).await?;
    let service = state.platform().get_service(service_id).await?;

    let action = format!("/services/{service_id}/users/invite");

    let response = if method == Method::POST {
        let (email_address, permissions) = match &form {
            Some(Form(form)) => (
                form.email_address.trim().to_string(),
                parse_permissions(&form.permissions),
            ),
            None => (String::new(), Vec::new()),
        };

        if valid_email(&email_address) {
            let invite = state
                .platform()
                .create_invite(user.id, service_id, &email_address, &permissions)
                .await?;
            info!(
                invite_id = %invite.id,
                service_id = %service_id,
                "invitation sent"
            );
            found(&action)
        } else {
            invite_page(&action, &service.name, Some("Enter a valid email address"))
        }
    } else {
        invite_page(&action, &service.name, None)
    };

    Ok(finish(&state, &token, session, fresh, response).await)
}

fn invite_page(action: &str, service_name: &str, error: Option<&str>) -> Response {
    let body = render::invite_form(action, service_name, error);
    Html(render::page("Invite a team member", &body)).into_response()
}

fn parse_permissions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|permission| !permission.is_empty())
        .map(ToString::to_string)
        .collect()
}
