//! JSON envelope shared by every API handler.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use regdesk_state::StateError;
use serde::Serialize;

/// Response wrapper for consistent API format.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// Paging details attached to list responses that asked for a page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        })
    }

    pub fn paged(data: T, meta: PageMeta) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(meta),
        })
    }
}

pub(crate) fn error_response(msg: &str, status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
            meta: None,
        }),
    )
        .into_response()
}

/// Map a store error to 400/404/500, logging server-side failures.
pub(crate) fn state_error_response(err: &StateError) -> Response {
    match err {
        StateError::Invalid(msg) => error_response(msg, StatusCode::BAD_REQUEST),
        StateError::NotFound(what) => {
            error_response(&format!("not found: {what}"), StatusCode::NOT_FOUND)
        }
        other => {
            tracing::error!(error = %other, "store operation failed");
            error_response(&other.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
