//! The SMS tour wizard.
//!
//! Pure planning and validation for the step-by-step placeholder flow.
//! Everything here operates on an explicit value map (the session's
//! `placeholders`) so the logic is unit-testable without HTTP or session
//! machinery. Steps are 1-indexed in the external URL.

pub mod placeholders;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Field name the current user's own number is prefilled under.
pub const RECIPIENT_FIELD: &str = "phone number";

/// Distinct placeholders the template body requires, in order.
#[must_use]
pub fn required_fields(body: &str) -> Vec<String> {
    placeholders::names(body)
}

/// True when every required field has a stored value.
#[must_use]
pub fn all_fields_filled(fields: &[String], values: &HashMap<String, String>) -> bool {
    fields
        .iter()
        .all(|field| values.contains_key(&placeholders::normalize(field)))
}

/// What a given step URL should do.
#[derive(Debug, Eq, PartialEq)]
pub enum StepPlan {
    /// Render the form for the field at this 0-indexed position.
    Prompt { index: usize },
    /// Everything is filled in; move on to the review page.
    Review,
    /// The index ran past the end with values missing; start over at step 1.
    Restart,
}

#[must_use]
pub fn plan_step(
    fields: &[String],
    values: &HashMap<String, String>,
    step_index: usize,
) -> StepPlan {
    if step_index == 0 || step_index > fields.len() {
        if all_fields_filled(fields, values) {
            StepPlan::Review
        } else {
            StepPlan::Restart
        }
    } else {
        StepPlan::Prompt {
            index: step_index - 1,
        }
    }
}

/// Validation problems reported back on the step form.
#[derive(Debug, Eq, PartialEq, Error)]
pub enum ValueError {
    #[error("Cannot be empty")]
    Empty,
    #[error("Must be a valid mobile number")]
    InvalidPhoneNumber,
    #[error("International numbers are not enabled for this service")]
    InternationalNotAllowed,
}

/// Validate and canonicalise one submitted placeholder value.
///
/// The recipient field gets mobile number rules; everything else only has
/// to be non-empty.
///
/// # Errors
/// Returns a [`ValueError`] describing why the value was rejected.
pub fn validate_value(
    field: &str,
    value: &str,
    allow_international: bool,
) -> Result<String, ValueError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValueError::Empty);
    }
    if placeholders::normalize(field) == placeholders::normalize(RECIPIENT_FIELD) {
        return validate_mobile_number(value, allow_international);
    }
    Ok(value.to_string())
}

static DOMESTIC_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:07\d{9}|\+447\d{9})$").expect("domestic number pattern"));
static INTERNATIONAL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{8,15}$").expect("international number pattern"));

fn validate_mobile_number(value: &str, allow_international: bool) -> Result<String, ValueError> {
    let compact: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if DOMESTIC_NUMBER.is_match(&compact) {
        return Ok(compact);
    }
    if INTERNATIONAL_NUMBER.is_match(&compact) {
        if allow_international {
            return Ok(compact);
        }
        return Err(ValueError::InternationalNotAllowed);
    }
    Err(ValueError::InvalidPhoneNumber)
}

/// Parse the `step-{n}` path segment. Anything else is not a step URL.
#[must_use]
pub fn parse_step_segment(segment: &str) -> Option<usize> {
    segment.strip_prefix("step-")?.parse().ok()
}

#[must_use]
pub fn begin_url(service_id: Uuid, template_id: Uuid) -> String {
    format!("/services/{service_id}/tour/{template_id}")
}

#[must_use]
pub fn step_url(service_id: Uuid, template_id: Uuid, step_index: usize) -> String {
    format!("{}/step-{step_index}", begin_url(service_id, template_id))
}

#[must_use]
pub fn review_url(service_id: Uuid, template_id: Uuid) -> String {
    format!("/services/{service_id}/send/{template_id}/check")
}

/// Back-link for a step form: the previous step, or the start page from
/// step 1.
#[must_use]
pub fn back_link(service_id: Uuid, template_id: Uuid, step_index: usize) -> String {
    if step_index <= 1 {
        begin_url(service_id, template_id)
    } else {
        step_url(service_id, template_id, step_index - 1)
    }
}
