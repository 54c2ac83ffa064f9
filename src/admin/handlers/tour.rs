//! The SMS tour: one form per template placeholder, progress in session.
//!
//! Step URLs are 1-indexed (`step-1`, `step-2`, ...). The placeholder
//! sequence is recomputed from the template body on every request, so an
//! out-of-range index recovers instead of failing: forward to the review
//! page when everything is filled in, back to step 1 otherwise.

use axum::{
    Form,
    extract::{Extension, Path},
    http::{HeaderMap, Method},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{finish, found, require_user};
use crate::admin::error::PageError;
use crate::admin::render;
use crate::admin::session::load_or_create;
use crate::admin::state::AppState;
use crate::platform::TemplateType;
use crate::tour;
use crate::tour::placeholders;

const INTERNATIONAL_SMS_PERMISSION: &str = "international_sms";

#[derive(Debug, Deserialize)]
pub struct PlaceholderForm {
    pub placeholder_value: String,
}

pub async fn begin_tour(
    Path((service_id, template_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, PageError> {
    let (token, mut session, fresh) = load_or_create(&state, &headers).await;
    let user = require_user(&state, &session).await?;

    let template = state.platform().get_template(service_id, template_id).await?;
    if template.template_type != TemplateType::Sms || user.mobile_number.is_none() {
        return Err(PageError::NotFound);
    }

    session.placeholders = Some(HashMap::new());

    let continue_link = tour::step_url(service_id, template_id, 1);
    let body = format!(
        "<h1>{}</h1>\
         <p>Try out this template by filling in each placeholder. The text \
         message will be sent to your own mobile number.</p>\
         <a class=\"button\" href=\"{continue_link}\">Get started</a>",
        render::escape(&template.name)
    );
    let response = Html(render::page("Example text message", &body)).into_response();
    Ok(finish(&state, &token, session, fresh, response).await)
}

pub async fn tour_step(
    Path((service_id, template_id, step)): Path<(Uuid, Uuid, String)>,
    method: Method,
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
    form: Option<Form<PlaceholderForm>>,
) -> Result<Response, PageError> {
    let Some(step_index) = tour::parse_step_segment(&step) else {
        return Err(PageError::NotFound);
    };

    let (token, mut session, fresh) = load_or_create(&state, &headers).await;
    let user = require_user(&state, &session).await?;

    let template = state.platform().get_template(service_id, template_id).await?;
    if template.template_type != TemplateType::Sms {
        return Err(PageError::NotFound);
    }
    let service = state.platform().get_service(service_id).await?;

    let fields = tour::required_fields(&template.body);
    let values = session.placeholders.get_or_insert_with(HashMap::new);
    if let Some(number) = &user.mobile_number {
        values.insert(
            placeholders::normalize(tour::RECIPIENT_FIELD),
            number.clone(),
        );
    }

    let response = match tour::plan_step(&fields, values, step_index) {
        tour::StepPlan::Review => found(&tour::review_url(service_id, template_id)),
        tour::StepPlan::Restart => found(&tour::step_url(service_id, template_id, 1)),
        tour::StepPlan::Prompt { index } => {
            let placeholder = fields[index].clone();
            let key = placeholders::normalize(&placeholder);
            if method == Method::POST {
                let submitted = form
                    .map(|Form(form)| form.placeholder_value)
                    .unwrap_or_default();
                let allow_international = service.has_permission(INTERNATIONAL_SMS_PERMISSION);
                match tour::validate_value(&placeholder, &submitted, allow_international) {
                    Ok(value) => {
                        values.insert(key, value);
                        if tour::all_fields_filled(&fields, values) {
                            found(&tour::review_url(service_id, template_id))
                        } else {
                            found(&tour::step_url(service_id, template_id, step_index + 1))
                        }
                    }
                    Err(err) => step_form(
                        service_id,
                        template_id,
                        step_index,
                        &placeholder,
                        Some(&submitted),
                        Some(&err.to_string()),
                    ),
                }
            } else {
                let prefill = values.get(&key).cloned();
                step_form(
                    service_id,
                    template_id,
                    step_index,
                    &placeholder,
                    prefill.as_deref(),
                    None,
                )
            }
        }
    };

    Ok(finish(&state, &token, session, fresh, response).await)
}

/// Review page: everything filled in, shown once before sending.
pub async fn check_notification(
    Path((service_id, template_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, PageError> {
    let (token, session, fresh) = load_or_create(&state, &headers).await;
    require_user(&state, &session).await?;

    let template = state.platform().get_template(service_id, template_id).await?;
    if template.template_type != TemplateType::Sms {
        return Err(PageError::NotFound);
    }

    let fields = tour::required_fields(&template.body);
    let values = session.placeholders.clone().unwrap_or_default();

    let response = if tour::all_fields_filled(&fields, &values) {
        let recipient = values
            .get(&placeholders::normalize(tour::RECIPIENT_FIELD))
            .map(String::as_str)
            .unwrap_or_default();
        let rows: String = fields
            .iter()
            .map(|field| {
                let value = values
                    .get(&placeholders::normalize(field))
                    .map(String::as_str)
                    .unwrap_or_default();
                format!(
                    "<dt>{}</dt><dd>{}</dd>",
                    render::escape(field),
                    render::escape(value)
                )
            })
            .collect();
        let body = format!(
            "<h1>Preview of {}</h1><p>To: {}</p><dl>{rows}</dl>",
            render::escape(&template.name),
            render::escape(recipient)
        );
        Html(render::page("Check your message", &body)).into_response()
    } else {
        found(&tour::step_url(service_id, template_id, 1))
    };

    Ok(finish(&state, &token, session, fresh, response).await)
}

fn step_form(
    service_id: Uuid,
    template_id: Uuid,
    step_index: usize,
    placeholder: &str,
    prefill: Option<&str>,
    error: Option<&str>,
) -> Response {
    let action = tour::step_url(service_id, template_id, step_index);
    let back_link = tour::back_link(service_id, template_id, step_index);
    let body = render::placeholder_form(&action, placeholder, prefill, error, &back_link);
    Html(render::page("Example text message", &body)).into_response()
}
