//! regdesk-dashboard — server-rendered web UI for regdesk.
//!
//! Provides axum route handlers that render Askama HTML pages for
//! browsing and managing registrations. Tables, filters and charts are
//! plain HTML and CSS; mutations are ordinary form posts that redirect.
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /dashboard` | KPI cards, monthly chart, recent registrations |
//! | `GET /dashboard/registrations` | Filterable, sortable, paged table |
//! | `GET /dashboard/registrations/{id}` | Registration detail |
//! | `GET /dashboard/registrations/{id}/edit` | Edit form |
//! | `POST /dashboard/registrations/{id}/edit` | Save edit |
//! | `POST /dashboard/registrations/{id}/status` | Change status |
//! | `POST /dashboard/registrations/{id}/delete` | Delete |
//! | `POST /dashboard/registrations/bulk-status` | Change status of selected rows |

pub mod actions;
pub mod fields;
pub mod pages;
pub mod views;

use axum::Router;
use axum::routing::{get, post};
use regdesk_state::StateStore;

/// Shared state for dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub store: StateStore,
    /// Rows per table page when the query string doesn't say.
    pub page_size: usize,
}

/// Build the dashboard router.
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(pages::overview))
        .route("/registrations", get(pages::registrations))
        .route("/registrations/bulk-status", post(actions::bulk_status))
        .route("/registrations/{id}", get(pages::registration_detail))
        .route(
            "/registrations/{id}/edit",
            get(pages::edit_registration).post(actions::save_edit),
        )
        .route("/registrations/{id}/status", post(actions::change_status))
        .route("/registrations/{id}/delete", post(actions::delete_registration))
        .with_state(state)
}
