//! Export endpoint: registrations as a downloadable PDF or workbook.

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::{error, info};

use regdesk_report::{ExportFormat, ReportError, build_report};
use regdesk_state::{Registration, StateResult, StateStore, is_valid_id, normalize_selection};

use crate::ApiState;
use crate::response::{error_response, state_error_response};

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
    /// `all`, or a comma-separated list of registration ids.
    pub ids: Option<String>,
}

/// Which records an export covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSelection {
    All,
    Ids(Vec<String>),
}

impl ExportSelection {
    /// Parse the `ids` parameter. Ids keep their given order with
    /// repeats removed.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            return Ok(ExportSelection::All);
        }
        let ids = normalize_selection(raw.split(',').map(str::to_string).collect());
        if ids.is_empty() {
            return Err("ids is required".to_string());
        }
        if let Some(bad) = ids.iter().find(|id| !is_valid_id(id)) {
            return Err(format!("invalid registration id '{bad}'"));
        }
        Ok(ExportSelection::Ids(ids))
    }

    pub fn load(&self, store: &StateStore) -> StateResult<Vec<Registration>> {
        match self {
            ExportSelection::All => store.list_registrations(),
            ExportSelection::Ids(ids) => store.get_registrations(ids),
        }
    }
}

/// GET /api/v1/export?format=pdf|excel&ids=all|id,id,...
pub async fn export_registrations(
    State(state): State<ApiState>,
    Query(params): Query<ExportParams>,
) -> impl IntoResponse {
    let format = match params.format.as_deref().map(|f| f.parse::<ExportFormat>()) {
        Some(Ok(format)) => format,
        Some(Err(msg)) => return error_response(&msg, StatusCode::BAD_REQUEST),
        None => return error_response("format is required", StatusCode::BAD_REQUEST),
    };
    let selection = match params.ids.as_deref().map(ExportSelection::parse) {
        Some(Ok(selection)) => selection,
        Some(Err(msg)) => return error_response(&msg, StatusCode::BAD_REQUEST),
        None => return error_response("ids is required", StatusCode::BAD_REQUEST),
    };

    let records = match selection.load(&state.store) {
        Ok(records) => records,
        Err(e) => return state_error_response(&e),
    };

    let options = state.report.clone();
    let built =
        tokio::task::spawn_blocking(move || build_report(&records, format, &options)).await;

    match built {
        Ok(Ok(report)) => {
            info!(%format, bytes = report.bytes.len(), "export generated");
            let disposition = report.content_disposition();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, report.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                report.bytes,
            )
                .into_response()
        }
        Ok(Err(ReportError::NoData)) => {
            error_response(&ReportError::NoData.to_string(), StatusCode::NOT_FOUND)
        }
        Ok(Err(e)) => {
            error!(%format, error = %e, "export failed");
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(e) => {
            error!(error = %e, "export task panicked");
            error_response("export failed", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
