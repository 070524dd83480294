//! REST API handlers for registrations.
//!
//! Each handler reads/writes via `StateStore` and returns JSON responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use regdesk_query::{MonthlyCount, QueryParams, StatusSummary, monthly_counts};
use regdesk_state::*;

use crate::response::{ApiResponse, PageMeta, error_response, state_error_response};
use crate::{ApiState, DEFAULT_PAGE_SIZE};

fn invalid_id(id: &str) -> Response {
    warn!(%id, "rejected malformed registration id");
    error_response("invalid registration id", StatusCode::BAD_REQUEST)
}

fn bad_body(rejection: JsonRejection) -> Response {
    error_response(&rejection.body_text(), StatusCode::BAD_REQUEST)
}

// ── Queries ────────────────────────────────────────────────────

/// GET /api/v1/registrations
///
/// Without `page` the whole filtered list is returned; with `page` the
/// response carries a `meta` block.
pub async fn list_registrations(
    State(state): State<ApiState>,
    Query(params): Query<QueryParams>,
) -> impl IntoResponse {
    let query = match params.to_query(Utc::now().date_naive(), DEFAULT_PAGE_SIZE) {
        Ok(q) => q,
        Err(e) => return error_response(&e.to_string(), StatusCode::BAD_REQUEST),
    };
    let records = match state.store.list_registrations() {
        Ok(records) => records,
        Err(e) => return state_error_response(&e),
    };

    if params.is_paged() {
        let page = query.apply(&records);
        let meta = PageMeta {
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        };
        ApiResponse::paged(page.items, meta).into_response()
    } else {
        let rows: Vec<&Registration> = query.matching(&records);
        ApiResponse::ok(rows).into_response()
    }
}

/// GET /api/v1/registrations/{id}
pub async fn get_registration(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return invalid_id(&id);
    }
    match state.store.get_registration(&id) {
        Ok(Some(reg)) => ApiResponse::ok(reg).into_response(),
        Ok(None) => error_response("registration not found", StatusCode::NOT_FOUND),
        Err(e) => state_error_response(&e),
    }
}

/// Body of `GET /api/v1/stats`.
#[derive(Debug, Serialize)]
pub struct StatsBody {
    pub summary: StatusSummary,
    pub monthly: Vec<MonthlyCount>,
}

/// GET /api/v1/stats
pub async fn stats(State(state): State<ApiState>) -> impl IntoResponse {
    match state.store.list_registrations() {
        Ok(records) => ApiResponse::ok(StatsBody {
            summary: StatusSummary::from_records(&records),
            monthly: monthly_counts(&records),
        })
        .into_response(),
        Err(e) => state_error_response(&e),
    }
}

// ── Mutations ──────────────────────────────────────────────────

/// POST /api/v1/registrations
pub async fn create_registration(
    State(state): State<ApiState>,
    body: Result<Json<RegistrationDraft>, JsonRejection>,
) -> impl IntoResponse {
    let Json(draft) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    match state.store.create_registration(draft) {
        Ok(reg) => {
            info!(id = %reg.id, ticket_no = ?reg.ticket_no, "registration created");
            (StatusCode::CREATED, ApiResponse::ok(reg)).into_response()
        }
        Err(e) => state_error_response(&e),
    }
}

/// PUT /api/v1/registrations/{id}
pub async fn update_status(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return invalid_id(&id);
    }
    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    match state.store.update_status(&id, &update) {
        Ok(Some(reg)) => {
            info!(%id, status = %reg.status, "status updated");
            ApiResponse::ok(reg).into_response()
        }
        Ok(None) => error_response("registration not found", StatusCode::NOT_FOUND),
        Err(e) => state_error_response(&e),
    }
}

/// PATCH /api/v1/registrations/{id}
pub async fn patch_registration(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Result<Json<RegistrationPatch>, JsonRejection>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return invalid_id(&id);
    }
    let Json(patch) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    match state.store.patch_registration(&id, &patch) {
        Ok(Some(reg)) => {
            info!(%id, "registration edited");
            ApiResponse::ok(reg).into_response()
        }
        Ok(None) => error_response("registration not found", StatusCode::NOT_FOUND),
        Err(e) => state_error_response(&e),
    }
}

/// DELETE /api/v1/registrations/{id}
pub async fn delete_registration(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return invalid_id(&id);
    }
    match state.store.delete_registration(&id) {
        Ok(true) => {
            info!(%id, "registration deleted");
            ApiResponse::ok("deleted").into_response()
        }
        Ok(false) => error_response("registration not found", StatusCode::NOT_FOUND),
        Err(e) => state_error_response(&e),
    }
}

/// Batch status request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusRequest {
    pub ids: Vec<String>,
    pub status: RegistrationStatus,
    #[serde(default)]
    pub is_expired: Option<bool>,
}

/// POST /api/v1/registrations/status
///
/// All-or-nothing: one unknown id fails the whole batch with 404.
pub async fn update_status_batch(
    State(state): State<ApiState>,
    body: Result<Json<BatchStatusRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let ids = normalize_selection(req.ids);
    if ids.is_empty() {
        return error_response("ids must not be empty", StatusCode::BAD_REQUEST);
    }
    if let Some(bad) = ids.iter().find(|id| !is_valid_id(id)) {
        return invalid_id(bad);
    }

    let update = StatusUpdate {
        status: req.status,
        is_expired: req.is_expired,
    };
    match state.store.update_status_batch(&ids, &update) {
        Ok(updated) => {
            info!(count = updated.len(), status = %update.status, "batch status updated");
            ApiResponse::ok(updated).into_response()
        }
        Err(e) => state_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use regdesk_report::ReportOptions;
    use serde_json::Value;

    fn test_state() -> ApiState {
        let store = StateStore::open_in_memory().unwrap();
        ApiState {
            store,
            report: ReportOptions::default(),
        }
    }

    fn draft(name: &str, status: RegistrationStatus) -> RegistrationDraft {
        RegistrationDraft {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            status: Some(status),
            ..Default::default()
        }
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Query<QueryParams> {
        let obj: serde_json::Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        Query(serde_json::from_value(Value::Object(obj)).unwrap())
    }

    #[tokio::test]
    async fn list_registrations_empty() {
        let state = test_state();
        let resp = list_registrations(State(state), params(&[])).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], Value::Array(vec![]));
        assert!(body.get("meta").is_none());
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let state = test_state();
        for (name, status) in [
            ("Ada", RegistrationStatus::Upcoming),
            ("Grace", RegistrationStatus::Pending),
            ("Barbara", RegistrationStatus::Completed),
        ] {
            state.store.create_registration(draft(name, status)).unwrap();
        }

        let resp = list_registrations(State(state), params(&[("status", "pending")]))
            .await
            .into_response();
        let body = body_json(resp).await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["fullName"], "Grace");
        assert_eq!(rows[0]["status"], "pending");
    }

    #[tokio::test]
    async fn list_with_page_adds_meta() {
        let state = test_state();
        for i in 0..12 {
            state
                .store
                .create_registration(draft(&format!("Person{i:02}"), RegistrationStatus::Upcoming))
                .unwrap();
        }

        let resp = list_registrations(
            State(state),
            params(&[("page", "2"), ("pageSize", "5"), ("sort", "fullName")]),
        )
        .await
        .into_response();
        let body = body_json(resp).await;
        assert_eq!(body["meta"]["total"], 12);
        assert_eq!(body["meta"]["totalPages"], 3);
        assert_eq!(body["data"][0]["fullName"], "Person05");
    }

    #[tokio::test]
    async fn list_rejects_bad_filter() {
        let state = test_state();
        let resp = list_registrations(State(state), params(&[("sort", "shoeSize")]))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn create_and_get_registration() {
        let state = test_state();
        let resp = create_registration(
            State(state.clone()),
            Ok(Json(draft("Ada", RegistrationStatus::Upcoming))),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["ticketNo"], 211550);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let resp = get_registration(State(state), Path(id)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_rejects_invalid_draft() {
        let state = test_state();
        let resp = create_registration(
            State(state),
            Ok(Json(draft("", RegistrationStatus::Upcoming))),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_rejects_malformed_id() {
        let state = test_state();
        let resp = get_registration(State(state), Path("nope".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_nonexistent_registration() {
        let state = test_state();
        let resp = get_registration(State(state), Path(new_id())).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_status_is_idempotent() {
        let state = test_state();
        let reg = state
            .store
            .create_registration(draft("Ada", RegistrationStatus::Upcoming))
            .unwrap();

        for _ in 0..2 {
            let resp = update_status(
                State(state.clone()),
                Path(reg.id.clone()),
                Ok(Json(StatusUpdate::new(RegistrationStatus::Completed))),
            )
            .await
            .into_response();
            assert_eq!(resp.status(), StatusCode::OK);
            let body = body_json(resp).await;
            assert_eq!(body["data"]["status"], "completed");
            assert_eq!(body["data"]["isExpired"], true);
        }
    }

    #[tokio::test]
    async fn update_status_rejects_contradiction() {
        let state = test_state();
        let reg = state
            .store
            .create_registration(draft("Ada", RegistrationStatus::Upcoming))
            .unwrap();
        let resp = update_status(
            State(state),
            Path(reg.id),
            Ok(Json(StatusUpdate {
                status: RegistrationStatus::Pending,
                is_expired: Some(true),
            })),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_edits_fields() {
        let state = test_state();
        let reg = state
            .store
            .create_registration(draft("Ada", RegistrationStatus::Upcoming))
            .unwrap();
        let patch = RegistrationPatch {
            institution: Some("City Hospital".to_string()),
            ..Default::default()
        };
        let resp = patch_registration(State(state), Path(reg.id), Ok(Json(patch)))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["institution"], "City Hospital");
        assert_eq!(body["data"]["fullName"], "Ada");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let state = test_state();
        let reg = state
            .store
            .create_registration(draft("Ada", RegistrationStatus::Upcoming))
            .unwrap();

        let resp = delete_registration(State(state.clone()), Path(reg.id.clone()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["data"], "deleted");

        let resp = get_registration(State(state.clone()), Path(reg.id.clone()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = delete_registration(State(state), Path(reg.id)).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn batch_with_unknown_id_changes_nothing() {
        let state = test_state();
        let reg = state
            .store
            .create_registration(draft("Ada", RegistrationStatus::Upcoming))
            .unwrap();

        let req = BatchStatusRequest {
            ids: vec![reg.id.clone(), new_id()],
            status: RegistrationStatus::Completed,
            is_expired: None,
        };
        let resp = update_status_batch(State(state.clone()), Ok(Json(req)))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let stored = state.store.get_registration(&reg.id).unwrap().unwrap();
        assert_eq!(stored.status, RegistrationStatus::Upcoming);
    }

    #[tokio::test]
    async fn batch_updates_all() {
        let state = test_state();
        let a = state
            .store
            .create_registration(draft("Ada", RegistrationStatus::Upcoming))
            .unwrap();
        let b = state
            .store
            .create_registration(draft("Grace", RegistrationStatus::Pending))
            .unwrap();

        let req = BatchStatusRequest {
            ids: vec![a.id.clone(), b.id.clone()],
            status: RegistrationStatus::Completed,
            is_expired: Some(true),
        };
        let resp = update_status_batch(State(state.clone()), Ok(Json(req)))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 2);

        let summary = StatusSummary::from_records(&state.store.list_registrations().unwrap());
        assert_eq!(summary.completed, 2);
    }

    #[tokio::test]
    async fn stats_reports_summary() {
        let state = test_state();
        state
            .store
            .create_registration(draft("Ada", RegistrationStatus::Pending))
            .unwrap();
        let resp = stats(State(state)).await.into_response();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["summary"]["total"], 1);
        assert_eq!(body["data"]["summary"]["pending"], 1);
    }
}
