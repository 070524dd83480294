//! Dashboard action endpoints.
//!
//! Form handlers that perform mutations and redirect back to the page
//! the form came from.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::Form;
use serde::Deserialize;
use tracing::{info, warn};

use regdesk_state::{
    RegistrationStatus, StateError, StatusUpdate, is_valid_id, normalize_selection,
};

use crate::DashboardState;
use crate::fields::{EditForm, edit_fields};
use crate::pages::{RegistrationEditTemplate, not_found, render};

/// Only same-site dashboard paths are accepted as redirect targets.
fn safe_return(target: Option<&str>, fallback: &str) -> String {
    match target {
        Some(t) if t.starts_with("/dashboard") && !t.starts_with("//") => t.to_string(),
        _ => fallback.to_string(),
    }
}

#[derive(Template)]
#[template(path = "_partials/action_error.html")]
struct ActionErrorTemplate<'a> {
    message: &'a str,
}

fn error_fragment(status: StatusCode, msg: &str) -> Response {
    (status, render(ActionErrorTemplate { message: msg })).into_response()
}

fn store_failure(e: &StateError) -> Response {
    if e.is_client_error() {
        warn!(error = %e, "dashboard action rejected");
        error_fragment(StatusCode::BAD_REQUEST, &e.to_string())
    } else {
        warn!(error = %e, "dashboard action failed");
        error_fragment(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
    }
}

// ── Status ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: RegistrationStatus,
    #[serde(default)]
    pub return_to: Option<String>,
}

pub async fn change_status(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Response {
    if !is_valid_id(&id) {
        return not_found("No registration with that id.");
    }
    match state.store.update_status(&id, &StatusUpdate::new(form.status)) {
        Ok(Some(_)) => {
            info!(%id, status = %form.status, "status changed from dashboard");
            let fallback = format!("/dashboard/registrations/{id}");
            Redirect::to(&safe_return(form.return_to.as_deref(), &fallback)).into_response()
        }
        Ok(None) => not_found("No registration with that id."),
        Err(e) => store_failure(&e),
    }
}

// ── Delete ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub return_to: Option<String>,
}

pub async fn delete_registration(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    if !is_valid_id(&id) {
        return not_found("No registration with that id.");
    }
    match state.store.delete_registration(&id) {
        Ok(true) => {
            info!(%id, "registration deleted from dashboard");
            Redirect::to(&safe_return(
                form.return_to.as_deref(),
                "/dashboard/registrations",
            ))
            .into_response()
        }
        Ok(false) => not_found("No registration with that id."),
        Err(e) => store_failure(&e),
    }
}

// ── Bulk Status ─────────────────────────────────────────────────

/// Table form: one `ids` checkbox per selected row.
#[derive(Debug, Deserialize)]
pub struct BulkStatusForm {
    #[serde(default)]
    pub ids: Vec<String>,
    pub status: RegistrationStatus,
    #[serde(default)]
    pub return_to: Option<String>,
}

pub async fn bulk_status(
    State(state): State<DashboardState>,
    Form(form): Form<BulkStatusForm>,
) -> Response {
    let back = safe_return(form.return_to.as_deref(), "/dashboard/registrations");
    let ids = normalize_selection(form.ids);
    if ids.is_empty() {
        return Redirect::to(&back).into_response();
    }
    if ids.iter().any(|id| !is_valid_id(id)) {
        return error_fragment(StatusCode::BAD_REQUEST, "invalid registration id");
    }
    match state
        .store
        .update_status_batch(&ids, &StatusUpdate::new(form.status))
    {
        Ok(updated) => {
            info!(count = updated.len(), status = %form.status, "bulk status from dashboard");
            Redirect::to(&back).into_response()
        }
        Err(StateError::NotFound(id)) => error_fragment(
            StatusCode::NOT_FOUND,
            &format!("registration {id} no longer exists; nothing was changed"),
        ),
        Err(e) => store_failure(&e),
    }
}

// ── Edit ────────────────────────────────────────────────────────

pub async fn save_edit(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
    Form(form): Form<EditForm>,
) -> Response {
    if !is_valid_id(&id) {
        return not_found("No registration with that id.");
    }
    match state.store.patch_registration(&id, &form.into_patch()) {
        Ok(Some(_)) => {
            info!(%id, "registration edited from dashboard");
            Redirect::to(&format!("/dashboard/registrations/{id}")).into_response()
        }
        Ok(None) => not_found("No registration with that id."),
        Err(StateError::Invalid(msg)) => {
            // Re-render the form against the stored record with the error.
            match state.store.get_registration(&id) {
                Ok(Some(reg)) => (
                    StatusCode::BAD_REQUEST,
                    render(RegistrationEditTemplate {
                        active_page: "registrations",
                        id: reg.id.clone(),
                        full_name: reg.full_name.clone(),
                        error: Some(msg),
                        fields: edit_fields(&reg),
                    }),
                )
                    .into_response(),
                _ => error_fragment(StatusCode::BAD_REQUEST, &msg),
            }
        }
        Err(e) => store_failure(&e),
    }
}
