use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{CandidateId, CandidatePatch};
use super::intake::IngestFailure;
use super::repository::CandidateRepository;
use super::service::{CandidateQuery, CandidateService, CandidateServiceError, MutationRequest};

/// Router builder exposing the candidate table, shortlist, and upload endpoints.
pub fn candidate_router<R>(service: Arc<CandidateService<R>>) -> Router
where
    R: CandidateRepository + 'static,
{
    Router::new()
        .route(
            "/api/candidates",
            get(list_handler::<R>)
                .post(mutate_handler::<R>)
                .put(update_handler::<R>),
        )
        .route(
            "/api/candidates/upload",
            post(upload_handler::<R>).get(list_all_handler::<R>),
        )
        .route("/api/candidates/query", post(query_handler::<R>))
        .route("/api/candidates/filters", get(filters_handler::<R>))
        .route("/api/candidates/summary", get(summary_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    #[serde(rename = "selectedOnly")]
    selected_only: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OptionsParams {
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateCandidateRequest {
    id: CandidateId,
    #[serde(flatten)]
    patch: CandidatePatch,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<CandidateService<R>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    let selected_only = params.selected_only.as_deref() == Some("true");
    match service.list_candidates(selected_only) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_all_handler<R>(State(service): State<Arc<CandidateService<R>>>) -> Response
where
    R: CandidateRepository + 'static,
{
    match service.list_candidates(false) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn mutate_handler<R>(
    State(service): State<Arc<CandidateService<R>>>,
    request: Result<Json<MutationRequest>, JsonRejection>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.mutate(request) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<CandidateService<R>>>,
    request: Result<Json<UpdateCandidateRequest>, JsonRejection>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    let Json(UpdateCandidateRequest { id, patch }) = match request {
        Ok(request) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.update_candidate(&id, patch) {
        Ok(outcome) => {
            let payload = json!({
                "success": !outcome.capacity_reached,
                "candidate": outcome.candidate,
                "capacity_reached": outcome.capacity_reached,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

/// Accepts `{"candidates": [...]}` or a bare list of records.
pub(crate) async fn upload_handler<R>(
    State(service): State<Arc<CandidateService<R>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    let records = match &body {
        Value::Object(fields) => fields.get("candidates").unwrap_or(&Value::Null),
        other => other,
    };

    match service.upload_candidates(records) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn query_handler<R>(
    State(service): State<Arc<CandidateService<R>>>,
    query: Result<Json<CandidateQuery>, JsonRejection>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    let Json(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.query(&query) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn filters_handler<R>(
    State(service): State<Arc<CandidateService<R>>>,
    Query(params): Query<OptionsParams>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    match service.filter_options(params.search.as_deref()) {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn summary_handler<R>(State(service): State<Arc<CandidateService<R>>>) -> Response
where
    R: CandidateRepository + 'static,
{
    match service.shortlist_summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": format!("invalid request body: {}", rejection.body_text()),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn service_error_response(error: CandidateServiceError) -> Response {
    let status = match &error {
        CandidateServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        CandidateServiceError::InvalidAction(_)
        | CandidateServiceError::MissingField(_)
        | CandidateServiceError::Validation(_)
        | CandidateServiceError::InvalidPatch(_) => StatusCode::BAD_REQUEST,
        CandidateServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        CandidateServiceError::Validation(failure @ IngestFailure::NoValidRecords { rejected_count, .. }) => {
            json!({
                "error": error.to_string(),
                "rejected_count": rejected_count,
                "rejection_reasons": failure.reasons(),
            })
        }
        CandidateServiceError::Validation(failure) => json!({
            "error": error.to_string(),
            "rejection_reasons": failure.reasons(),
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, Json(payload)).into_response()
}
