//! regdesk-api — REST API for regdesk.
//!
//! Provides axum route handlers for listing, creating, editing and
//! exporting registrations, plus the uploaded-file store. Mounts the
//! dashboard under `/dashboard`.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/registrations` | List, filter, sort and page registrations |
//! | POST | `/api/v1/registrations` | Create a registration |
//! | POST | `/api/v1/registrations/status` | Set one status on many registrations |
//! | GET | `/api/v1/registrations/{id}` | Get a registration |
//! | PUT | `/api/v1/registrations/{id}` | Change a registration's status |
//! | PATCH | `/api/v1/registrations/{id}` | Edit registration fields |
//! | DELETE | `/api/v1/registrations/{id}` | Delete a registration |
//! | GET | `/api/v1/export` | Download registrations as PDF or Excel |
//! | GET | `/api/v1/files` | Download an uploaded file |
//! | POST | `/api/v1/files` | Upload a file |
//! | GET | `/api/v1/stats` | Status counts and monthly totals |

pub mod export_handlers;
pub mod file_handlers;
pub mod handlers;
pub mod response;

use axum::Router;
use axum::response::Redirect;
use axum::routing::{get, post};
use regdesk_report::ReportOptions;
use regdesk_state::StateStore;
use tower_http::trace::TraceLayer;

pub use response::ApiResponse;

/// Page size used by the list endpoint when `pageSize` is omitted.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: StateStore,
    pub report: ReportOptions,
}

/// Settings the daemon passes down from its config file.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub report: ReportOptions,
    pub dashboard_page_size: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            report: ReportOptions::default(),
            dashboard_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Build the complete router (REST + dashboard).
pub fn build_router(store: StateStore, options: RouterOptions) -> Router {
    let api_state = ApiState {
        store: store.clone(),
        report: options.report,
    };

    let dashboard_state = regdesk_dashboard::DashboardState {
        store,
        page_size: options.dashboard_page_size,
    };

    let api_routes = Router::new()
        .route(
            "/registrations",
            get(handlers::list_registrations).post(handlers::create_registration),
        )
        .route("/registrations/status", post(handlers::update_status_batch))
        .route(
            "/registrations/{id}",
            get(handlers::get_registration)
                .put(handlers::update_status)
                .patch(handlers::patch_registration)
                .delete(handlers::delete_registration),
        )
        .route("/export", get(export_handlers::export_registrations))
        .route(
            "/files",
            get(file_handlers::get_file).post(file_handlers::upload_file),
        )
        .route("/stats", get(handlers::stats))
        .with_state(api_state);

    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .nest("/api/v1", api_routes)
        .nest("/dashboard", regdesk_dashboard::dashboard_router(dashboard_state))
        .layer(TraceLayer::new_for_http())
}
