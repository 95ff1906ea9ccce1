use super::common::*;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::candidates::router::{candidate_router, list_handler};
use crate::candidates::service::CandidateService;

fn router_with(candidates: Vec<crate::candidates::Candidate>) -> axum::Router {
    let (service, _) = build_service(candidates);
    candidate_router(Arc::new(service))
}

#[tokio::test]
async fn list_route_honours_selected_only() {
    let response = router_with(roster(4, 1))
        .oneshot(get_request("/api/candidates?selectedOnly=true"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["candidates"][0]["id"], "c-1");
}

#[tokio::test]
async fn list_route_defaults_to_everything() {
    let response = router_with(roster(3, 1))
        .oneshot(get_request("/api/candidates"))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 3);
}

#[tokio::test]
async fn invalid_action_is_bad_request() {
    let response = router_with(roster(1, 0))
        .oneshot(json_request(
            Method::POST,
            "/api/candidates",
            json!({"action": "promote"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("promote"));
}

#[tokio::test]
async fn selecting_unknown_candidate_is_not_found() {
    let response = router_with(roster(1, 0))
        .oneshot(json_request(
            Method::POST,
            "/api/candidates",
            json!({"action": "select", "candidateId": "ghost"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn capacity_refusal_is_not_an_error_status() {
    let response = router_with(roster(6, 5))
        .oneshot(json_request(
            Method::POST,
            "/api/candidates",
            json!({"action": "select", "candidateId": "c-6"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["capacity_reached"], true);
    assert_eq!(payload["selectedCount"], 5);
    assert_eq!(payload["selection"]["outcome"], "capacity_reached");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/candidates")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request builds");

    let response = router_with(roster(1, 0))
        .oneshot(request)
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_route_patches_fields_without_touching_id() {
    let response = router_with(roster(2, 0))
        .oneshot(json_request(
            Method::PUT,
            "/api/candidates",
            json!({"id": "c-2", "location": "Remote", "phone": "555-0100"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], true);
    assert_eq!(payload["candidate"]["id"], "c-2");
    assert_eq!(payload["candidate"]["location"], "Remote");
    assert_eq!(payload["candidate"]["phone"], "555-0100");
}

#[tokio::test]
async fn update_route_accepts_single_availability_string() {
    let response = router_with(roster(1, 0))
        .oneshot(json_request(
            Method::PUT,
            "/api/candidates",
            json!({"id": "c-1", "workAvailability": "part-time"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["candidate"]["work_availability"], json!(["part-time"]));
}

#[tokio::test]
async fn filters_route_narrows_by_search() {
    let candidates = vec![
        with_skills(candidate("a", "Ann"), &["Python", "AWS"]),
        with_skills(candidate("b", "Bob"), &["python (django)"]),
    ];
    let response = router_with(candidates)
        .oneshot(get_request("/api/candidates/filters?search=PYTH"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["skills"], json!(["Python", "python (django)"]));
    assert_eq!(payload["locations"], json!([]));
}

#[tokio::test]
async fn update_route_returns_not_found() {
    let response = router_with(roster(1, 0))
        .oneshot(json_request(
            Method::PUT,
            "/api/candidates",
            json!({"id": "ghost", "name": "Nobody"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_route_accepts_wrapped_candidates() {
    let response = router_with(Vec::new())
        .oneshot(json_request(
            Method::POST,
            "/api/candidates/upload",
            json!({"candidates": [raw_record("A"), {}]}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["accepted_count"], 1);
    assert_eq!(payload["rejected_count"], 1);
    assert_eq!(payload["candidates"][0]["name"], "A");
}

#[tokio::test]
async fn upload_route_reports_rejections() {
    let response = router_with(roster(2, 0))
        .oneshot(json_request(
            Method::POST,
            "/api/candidates/upload",
            json!({"candidates": [{}]}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["rejected_count"], 1);
    let reasons = payload["rejection_reasons"]
        .as_array()
        .expect("reasons listed");
    assert!(reasons[0]
        .as_str()
        .unwrap_or_default()
        .contains("missing required"));
}

#[tokio::test]
async fn upload_route_rejects_non_lists() {
    let response = router_with(Vec::new())
        .oneshot(json_request(
            Method::POST,
            "/api/candidates/upload",
            json!({"candidates": "nope"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["rejection_reasons"], json!(["not an array"]));
}

#[tokio::test]
async fn query_route_returns_scored_rows() {
    let candidates = vec![
        with_skills(candidate("a", "Ann"), &["Python"]),
        with_skills(candidate("b", "Bob"), &["Python", "AWS"]),
    ];
    let response = router_with(candidates)
        .oneshot(json_request(
            Method::POST,
            "/api/candidates/query",
            json!({"filters": {"skills": ["aws"]}}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["matched"], 1);
    assert_eq!(payload["candidates"][0]["id"], "b");
    assert_eq!(payload["candidates"][0]["score"], 31);
}

#[tokio::test]
async fn filters_and_summary_routes_respond() {
    let router = router_with(roster(3, 2));

    let response = router
        .clone()
        .oneshot(get_request("/api/candidates/filters"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["locations"], json!(["New York"]));
    assert_eq!(payload["salaryBounds"]["max"], 120_000);

    let response = router
        .oneshot(get_request("/api/candidates/summary"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_selected"], 2);
    assert_eq!(payload["remaining_slots"], 3);
}

#[tokio::test]
async fn list_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(CandidateService::new(Arc::new(UnavailableRepository)));

    let response = list_handler::<UnavailableRepository>(
        State(service),
        Query(serde_json::from_value(Value::Object(Default::default())).expect("params")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("database offline"));
}
