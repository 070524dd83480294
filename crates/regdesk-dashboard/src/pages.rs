//! Dashboard page handlers.
//!
//! Each handler queries the state store, builds view types, and renders
//! an Askama template. Form posts are in `actions.rs`.

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use tracing::warn;

use regdesk_query::{
    DatePreset, QueryParams, RegistrationQuery, StatusFilter, StatusSummary, monthly_counts,
};
use regdesk_state::{Registration, RegistrationStatus, is_valid_id};

use crate::DashboardState;
use crate::fields::{FieldView, edit_fields};
use crate::views::*;

pub(crate) fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        format!("<pre>Template error: {e}</pre>")
    }))
}

// ── Overview ────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "overview.html")]
struct OverviewTemplate {
    active_page: &'static str,
    kpis: Vec<KpiCard>,
    monthly: Vec<BarView>,
    statuses: Vec<BarView>,
    recent: Vec<RegistrationRow>,
}

pub async fn overview(State(state): State<DashboardState>) -> Html<String> {
    let records = state.store.list_registrations().unwrap_or_else(|e| {
        warn!(error = %e, "overview: failed to load registrations");
        Vec::new()
    });
    let summary = StatusSummary::from_records(&records);

    // Newest first from the store; the overview shows the latest five.
    let recent = records
        .iter()
        .take(5)
        .map(RegistrationRow::from_registration)
        .collect();

    render(OverviewTemplate {
        active_page: "overview",
        kpis: kpi_cards(&summary),
        monthly: monthly_bars(&monthly_counts(&records)),
        statuses: status_bars(&summary),
        recent,
    })
}

// ── Registrations Table ─────────────────────────────────────────

const PAGE_SIZES: [&str; 3] = ["10", "25", "50"];

pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "registrations.html")]
struct RegistrationsTemplate {
    active_page: &'static str,
    error: Option<String>,
    search: String,
    start: String,
    end: String,
    sort: String,
    order: String,
    status_options: Vec<FilterOption>,
    preset_options: Vec<FilterOption>,
    page_size_options: Vec<FilterOption>,
    headers: Vec<SortHeader>,
    rows: Vec<RegistrationRow>,
    pagination: Pagination,
    bulk_statuses: Vec<FilterOption>,
    return_to: String,
    export_pdf: Option<String>,
    export_excel: Option<String>,
}

pub async fn registrations(
    State(state): State<DashboardState>,
    Query(params): Query<QueryParams>,
) -> Html<String> {
    let today = Utc::now().date_naive();
    let (query, error) = match params.to_query(today, state.page_size) {
        Ok(q) => (q, None),
        Err(e) => (
            RegistrationQuery {
                page_size: state.page_size,
                ..Default::default()
            },
            Some(e.to_string()),
        ),
    };

    let records = state.store.list_registrations().unwrap_or_else(|e| {
        warn!(error = %e, "registrations: failed to load");
        Vec::new()
    });

    let matching: Vec<&Registration> = query.matching(&records);
    let filtered = !query.search.trim().is_empty()
        || query.status != StatusFilter::All
        || (query.start.is_some() && query.end.is_some());
    let export_ids: Option<Vec<String>> =
        filtered.then(|| matching.iter().map(|r| r.id.clone()).collect());

    let page = query.apply(&records);
    let rows = page.items.iter().map(RegistrationRow::from_registration).collect();

    let preset_value = params.preset.as_deref().unwrap_or("all");
    let status_options = StatusFilter::ALL
        .iter()
        .map(|&s| FilterOption {
            value: s.as_str(),
            label: match s {
                StatusFilter::All => "All statuses",
                StatusFilter::Upcoming => "Upcoming",
                StatusFilter::Pending => "Pending",
                StatusFilter::Completed => "Completed",
            },
            selected: s == query.status,
        })
        .collect();
    let preset_options = DatePreset::ALL
        .iter()
        .map(|&p| FilterOption {
            value: p.as_str(),
            label: p.label(),
            selected: p.as_str().eq_ignore_ascii_case(preset_value),
        })
        .collect();

    let page_size_options = PAGE_SIZES
        .iter()
        .map(|&size| FilterOption {
            value: size,
            label: size,
            selected: size.parse::<usize>().ok() == Some(query.page_size),
        })
        .collect();

    render(RegistrationsTemplate {
        active_page: "registrations",
        error,
        search: query.search.clone(),
        start: query.start.map(|d| d.to_string()).unwrap_or_default(),
        end: query.end.map(|d| d.to_string()).unwrap_or_default(),
        sort: query.sort.map(|k| k.as_str().to_string()).unwrap_or_default(),
        order: if query.ascending { "asc" } else { "desc" }.to_string(),
        status_options,
        preset_options,
        page_size_options,
        headers: sort_headers(&params, query.sort, query.ascending),
        rows,
        pagination: pagination(
            &params,
            page.page,
            page.total_pages,
            page.first_index(),
            page.last_index(),
            page.total,
        ),
        bulk_statuses: status_choices(None),
        return_to: registrations_href(&params),
        export_pdf: export_href("pdf", export_ids.as_deref()),
        export_excel: export_href("excel", export_ids.as_deref()),
    })
}

pub(crate) fn status_choices(current: Option<RegistrationStatus>) -> Vec<FilterOption> {
    RegistrationStatus::ALL
        .iter()
        .map(|&s| FilterOption {
            value: s.as_str(),
            label: s.label(),
            selected: Some(s) == current,
        })
        .collect()
}

// ── Registration Detail ─────────────────────────────────────────

#[derive(Template)]
#[template(path = "registration_detail.html")]
struct RegistrationDetailTemplate {
    active_page: &'static str,
    registration: RegistrationDetail,
    statuses: Vec<FilterOption>,
    export_pdf: String,
    export_excel: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    active_page: &'static str,
    message: String,
}

pub(crate) fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        render(NotFoundTemplate {
            active_page: "registrations",
            message: message.to_string(),
        }),
    )
        .into_response()
}

fn load(state: &DashboardState, id: &str) -> Result<Registration, Response> {
    if !is_valid_id(id) {
        return Err(not_found("No registration with that id."));
    }
    match state.store.get_registration(id) {
        Ok(Some(reg)) => Ok(reg),
        Ok(None) => Err(not_found("No registration with that id.")),
        Err(e) => {
            warn!(%id, error = %e, "failed to load registration");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("<pre>Error: {e}</pre>")),
            )
                .into_response())
        }
    }
}

pub async fn registration_detail(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Response {
    let reg = match load(&state, &id) {
        Ok(reg) => reg,
        Err(resp) => return resp,
    };
    render(RegistrationDetailTemplate {
        active_page: "registrations",
        registration: RegistrationDetail::from_registration(&reg),
        statuses: status_choices(Some(reg.status)),
        export_pdf: record_export_href("pdf", &reg.id),
        export_excel: record_export_href("excel", &reg.id),
    })
    .into_response()
}

// ── Edit Form ───────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "registration_edit.html")]
pub(crate) struct RegistrationEditTemplate {
    pub active_page: &'static str,
    pub id: String,
    pub full_name: String,
    pub error: Option<String>,
    pub fields: Vec<FieldView>,
}

pub async fn edit_registration(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Response {
    let reg = match load(&state, &id) {
        Ok(reg) => reg,
        Err(resp) => return resp,
    };
    render(RegistrationEditTemplate {
        active_page: "registrations",
        id: reg.id.clone(),
        full_name: reg.full_name.clone(),
        error: None,
        fields: edit_fields(&reg),
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use regdesk_state::{RegistrationDraft, StateStore, new_id};

    fn test_state() -> DashboardState {
        DashboardState {
            store: StateStore::open_in_memory().unwrap(),
            page_size: 10,
        }
    }

    fn create(state: &DashboardState, name: &str, status: RegistrationStatus) -> Registration {
        state
            .store
            .create_registration(RegistrationDraft {
                full_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                status: Some(status),
                ..Default::default()
            })
            .unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Query<QueryParams> {
        let query: String = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        Query(serde_urlencoded::from_str(&query).unwrap())
    }

    #[tokio::test]
    async fn overview_renders_html() {
        let state = test_state();
        create(&state, "Ada", RegistrationStatus::Pending);

        let resp = overview(State(state)).await.into_response();
        assert_eq!(resp.status(), 200);
        let html = body_text(resp).await;
        assert!(html.contains("Total Registrations"));
        assert!(html.contains("Ada"));
    }

    #[tokio::test]
    async fn overview_empty_state() {
        let state = test_state();
        let resp = overview(State(state)).await.into_response();
        assert_eq!(resp.status(), 200);
        assert!(!body_text(resp).await.contains("Template error"));
    }

    #[tokio::test]
    async fn registrations_page_filters() {
        let state = test_state();
        create(&state, "Ada", RegistrationStatus::Upcoming);
        create(&state, "Grace", RegistrationStatus::Pending);

        let resp = registrations(State(state), params(&[("status", "pending")]))
            .await
            .into_response();
        assert_eq!(resp.status(), 200);
        let html = body_text(resp).await;
        assert!(html.contains("Grace"));
        assert!(!html.contains("ada@example.com"));
        assert!(html.contains("Showing 1 to 1 of 1 results"));
    }

    #[tokio::test]
    async fn registrations_page_reports_bad_filter() {
        let state = test_state();
        create(&state, "Ada", RegistrationStatus::Upcoming);
        let resp = registrations(State(state), params(&[("sort", "shoeSize")]))
            .await
            .into_response();
        assert_eq!(resp.status(), 200);
        let html = body_text(resp).await;
        assert!(html.contains("unknown sort key"));
        assert!(html.contains("Ada"));
    }

    #[tokio::test]
    async fn registrations_page_without_matches_has_no_export_link() {
        let state = test_state();
        create(&state, "Ada", RegistrationStatus::Upcoming);
        let resp = registrations(State(state), params(&[("status", "completed")]))
            .await
            .into_response();
        let html = body_text(resp).await;
        assert!(html.contains("Showing 0 to 0 of 0 results"));
        assert!(!html.contains("/api/v1/export"));
        assert!(html.contains("Export PDF"));
        assert!(html.contains(r#"placeholder="Name, email, profession, ticket""#));
    }

    #[tokio::test]
    async fn registrations_page_size_selector() {
        let state = test_state();
        for n in 0..30 {
            create(&state, &format!("User{n}"), RegistrationStatus::Upcoming);
        }
        let resp = registrations(
            State(state),
            params(&[("status", "upcoming"), ("pageSize", "25")]),
        )
        .await
        .into_response();
        let html = body_text(resp).await;
        assert!(html.contains(r#"name="pageSize""#));
        assert!(html.contains(r#"<option value="25" selected>"#));
        assert!(html.contains("Showing 1 to 25 of 30 results"));
    }

    #[tokio::test]
    async fn detail_links_single_record_export() {
        let state = test_state();
        let reg = create(&state, "Ada", RegistrationStatus::Pending);
        let resp = registration_detail(State(state), Path(reg.id.clone())).await;
        let html = body_text(resp).await;
        assert!(html.contains("/api/v1/export?format=pdf"));
        assert!(html.contains("/api/v1/export?format=excel"));
        assert!(html.contains(&format!("ids={}", reg.id)));
    }

    #[tokio::test]
    async fn detail_shows_labels() {
        let state = test_state();
        let reg = create(&state, "Ada", RegistrationStatus::Completed);
        let resp = registration_detail(State(state), Path(reg.id)).await;
        assert_eq!(resp.status(), 200);
        let html = body_text(resp).await;
        assert!(html.contains("Ticket No."));
        assert!(html.contains("#211550"));
        assert!(html.contains("Expired"));
    }

    #[tokio::test]
    async fn detail_unknown_is_not_found() {
        let state = test_state();
        let resp = registration_detail(State(state.clone()), Path(new_id())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = registration_detail(State(state), Path("bogus".to_string())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_form_renders_widgets() {
        let state = test_state();
        let reg = create(&state, "Ada", RegistrationStatus::Upcoming);
        let resp = edit_registration(State(state), Path(reg.id)).await;
        assert_eq!(resp.status(), 200);
        let html = body_text(resp).await;
        assert!(html.contains(r#"name="fullName""#));
        assert!(html.contains(r#"type="datetime-local""#));
        assert!(html.contains(r#"type="checkbox""#));
        assert!(html.contains("Cadaver Lab Training"));
    }
}
