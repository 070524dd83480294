//! Standalone regression tests.
//!
//! Drives the full router (REST API + dashboard) the way the daemon
//! serves it, against in-memory and on-disk stores.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use regdesk_api::{RouterOptions, build_router};
use regdesk_state::*;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_router() -> (StateStore, Router) {
    let store = StateStore::open_in_memory().unwrap();
    let router = build_router(store.clone(), RouterOptions::default());
    (store, router)
}

async fn send(router: &Router, req: Request<Body>) -> Response {
    router.clone().oneshot(req).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(router: &Router, name: &str, status: &str) -> Value {
    let resp = send(
        router,
        json_request(
            "POST",
            "/api/v1/registrations",
            json!({
                "fullName": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "status": status,
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await["data"].clone()
}

#[tokio::test]
async fn standalone_create_assigns_first_ticket() {
    let (_, router) = test_router();
    let reg = create(&router, "Ada", "upcoming").await;
    assert_eq!(reg["ticketNo"], 211550);
    assert_eq!(reg["isExpired"], false);

    let second = create(&router, "Grace", "completed").await;
    assert_eq!(second["ticketNo"], 211551);
    assert_eq!(second["isExpired"], true);
}

#[tokio::test]
async fn standalone_status_filter_over_http() {
    let (_, router) = test_router();
    create(&router, "Ada", "upcoming").await;
    create(&router, "Grace", "pending").await;
    create(&router, "Barbara", "completed").await;

    let resp = send(&router, get("/api/v1/registrations?status=pending")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["fullName"], "Grace");
}

#[tokio::test]
async fn standalone_empty_export_is_not_found() {
    let (_, router) = test_router();
    for format in ["excel", "pdf"] {
        let resp = send(&router, get(&format!("/api/v1/export?format={format}&ids=all"))).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{format}");
        assert_eq!(body_json(resp).await["error"], "no data to export");
    }
}

#[tokio::test]
async fn standalone_export_excel_attachment() {
    let (_, router) = test_router();
    create(&router, "Ada", "upcoming").await;

    let resp = send(&router, get("/api/v1/export?format=excel&ids=all")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp.headers()["content-disposition"].to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(".xlsx"));
}

#[tokio::test]
async fn standalone_delete_then_get_is_not_found() {
    let (_, router) = test_router();
    let reg = create(&router, "Ada", "upcoming").await;
    let id = reg["id"].as_str().unwrap();

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/registrations/{id}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&router, req).await.status(), StatusCode::OK);

    let resp = send(&router, get(&format!("/api/v1/registrations/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn standalone_batch_status_is_all_or_nothing() {
    let (store, router) = test_router();
    let a = create(&router, "Ada", "upcoming").await;
    let b = create(&router, "Grace", "upcoming").await;
    let a_id = a["id"].as_str().unwrap().to_string();
    let b_id = b["id"].as_str().unwrap().to_string();

    let resp = send(
        &router,
        json_request(
            "POST",
            "/api/v1/registrations/status",
            json!({ "ids": [a_id, new_id()], "status": "completed" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let stored = store.get_registration(&a_id).unwrap().unwrap();
    assert_eq!(stored.status, RegistrationStatus::Upcoming);

    let resp = send(
        &router,
        json_request(
            "POST",
            "/api/v1/registrations/status",
            json!({ "ids": [a_id, b_id], "status": "completed" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    for id in [&a_id, &b_id] {
        let stored = store.get_registration(id).unwrap().unwrap();
        assert_eq!(stored.status, RegistrationStatus::Completed);
        assert!(stored.is_expired);
    }
}

#[tokio::test]
async fn standalone_dashboard_pages_render() {
    let (_, router) = test_router();
    let reg = create(&router, "Ada", "pending").await;
    let id = reg["id"].as_str().unwrap();

    for uri in [
        "/dashboard".to_string(),
        "/dashboard/registrations".to_string(),
        format!("/dashboard/registrations/{id}"),
        format!("/dashboard/registrations/{id}/edit"),
    ] {
        let resp = send(&router, get(&uri)).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let content_type = resp.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/html"), "{uri}");
    }

    let resp = send(&router, get("/")).await;
    assert!(resp.status().is_redirection());
}

#[tokio::test]
async fn standalone_dashboard_bulk_form() {
    let (store, router) = test_router();
    let a = create(&router, "Ada", "upcoming").await;
    let b = create(&router, "Grace", "upcoming").await;
    let a_id = a["id"].as_str().unwrap();
    let b_id = b["id"].as_str().unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/dashboard/registrations/bulk-status")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "ids={a_id}&ids={b_id}&status=pending&return_to=%2Fdashboard%2Fregistrations"
        )))
        .unwrap();
    let resp = send(&router, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/dashboard/registrations");

    for id in [a_id, b_id] {
        let stored = store.get_registration(id).unwrap().unwrap();
        assert_eq!(stored.status, RegistrationStatus::Pending);
    }
}

#[tokio::test]
async fn standalone_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regdesk.redb");

    let id = {
        let store = StateStore::open(&path).unwrap();
        let router = build_router(store, RouterOptions::default());
        create(&router, "Ada", "upcoming").await["id"]
            .as_str()
            .unwrap()
            .to_string()
    };

    let store = StateStore::open(&path).unwrap();
    let reg = store.get_registration(&id).unwrap().unwrap();
    assert_eq!(reg.full_name, "Ada");
    assert_eq!(reg.ticket_no, Some(211550));

    let next = store
        .create_registration(RegistrationDraft {
            full_name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(next.ticket_no, Some(211551));
}

#[tokio::test]
async fn standalone_stats_counts_statuses() {
    let (_, router) = test_router();
    create(&router, "Ada", "upcoming").await;
    create(&router, "Grace", "completed").await;

    let resp = send(&router, get("/api/v1/stats")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["summary"]["total"], 2);
}
