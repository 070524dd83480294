//! Uploaded-file endpoints (ID card scans and similar attachments).

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::info;

use regdesk_state::is_valid_id;

use crate::ApiState;
use crate::response::{ApiResponse, error_response, state_error_response};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Default, Deserialize)]
pub struct FileQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

/// GET /api/v1/files?id=...
pub async fn get_file(
    State(state): State<ApiState>,
    Query(query): Query<FileQuery>,
) -> impl IntoResponse {
    let id = match query.id.as_deref().map(str::trim) {
        Some(id) if is_valid_id(id) => id.to_string(),
        _ => return error_response("invalid or missing file id", StatusCode::BAD_REQUEST),
    };

    match state.store.get_file(&id) {
        Ok(Some((meta, bytes))) => {
            let content_type = if meta.content_type.is_empty() {
                FALLBACK_CONTENT_TYPE.to_string()
            } else {
                meta.content_type
            };
            let disposition = format!(
                "attachment; filename=\"{}\"",
                header_filename(&meta.filename)
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Ok(None) => error_response("file not found", StatusCode::NOT_FOUND),
        Err(e) => state_error_response(&e),
    }
}

/// Filename safe to quote inside a header value.
fn header_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect()
}

/// POST /api/v1/files?filename=...  (raw request body is the file)
pub async fn upload_file(
    State(state): State<ApiState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let filename = match query.filename.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return error_response("filename is required", StatusCode::BAD_REQUEST),
    };
    if body.is_empty() {
        return error_response("file body is empty", StatusCode::BAD_REQUEST);
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(FALLBACK_CONTENT_TYPE);

    match state.store.put_file(&filename, content_type, &body) {
        Ok(meta) => {
            info!(id = %meta.id, size = meta.size, "file uploaded");
            (StatusCode::CREATED, ApiResponse::ok(meta)).into_response()
        }
        Err(e) => state_error_response(&e),
    }
}
