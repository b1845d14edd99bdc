use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::domain::{QuestionCatalog, QuestionId, RecommendationAction};
use super::repository::{RepositoryError, SessionId, SessionRepository, SubmissionGateway};
use super::service::{InspectionService, InspectionServiceError};

/// Router builder exposing HTTP endpoints for the inspection engine.
pub fn inspection_router<R, G>(service: Arc<InspectionService<R, G>>) -> Router
where
    R: SessionRepository + 'static,
    G: SubmissionGateway + 'static,
{
    Router::new()
        .route("/api/v1/inspections", post(open_handler::<R, G>))
        .route(
            "/api/v1/inspections/:session_id",
            get(snapshot_handler::<R, G>),
        )
        .route(
            "/api/v1/inspections/:session_id/responses",
            put(response_handler::<R, G>),
        )
        .route(
            "/api/v1/inspections/:session_id/fields",
            put(field_handler::<R, G>),
        )
        .route(
            "/api/v1/inspections/:session_id/expired",
            put(expired_handler::<R, G>),
        )
        .route(
            "/api/v1/inspections/:session_id/checks",
            put(check_handler::<R, G>),
        )
        .route(
            "/api/v1/inspections/:session_id/submit",
            post(submit_handler::<R, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseUpdate {
    question_id: QuestionId,
    response: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldUpdate {
    question_id: QuestionId,
    field_name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpiredFlagUpdate {
    question_id: QuestionId,
    expired: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckUpdate {
    action: RecommendationAction,
    checked: bool,
}

pub(crate) async fn open_handler<R, G>(
    State(service): State<Arc<InspectionService<R, G>>>,
    axum::Json(catalog): axum::Json<QuestionCatalog>,
) -> Response
where
    R: SessionRepository + 'static,
    G: SubmissionGateway + 'static,
{
    match service.open(catalog) {
        Ok(record) => {
            let view = record.status_view(Local::now().date_naive());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn snapshot_handler<R, G>(
    State(service): State<Arc<InspectionService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: SubmissionGateway + 'static,
{
    match service.snapshot(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn response_handler<R, G>(
    State(service): State<Arc<InspectionService<R, G>>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<ResponseUpdate>,
) -> Response
where
    R: SessionRepository + 'static,
    G: SubmissionGateway + 'static,
{
    let result = service.record_response(
        &SessionId(session_id),
        &update.question_id,
        &update.response,
        update.notes.as_deref(),
        update.remarks.as_deref(),
    );
    snapshot_response(result)
}

pub(crate) async fn field_handler<R, G>(
    State(service): State<Arc<InspectionService<R, G>>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<FieldUpdate>,
) -> Response
where
    R: SessionRepository + 'static,
    G: SubmissionGateway + 'static,
{
    let result = service.record_field(
        &SessionId(session_id),
        &update.question_id,
        &update.field_name,
        &update.value,
    );
    snapshot_response(result)
}

pub(crate) async fn expired_handler<R, G>(
    State(service): State<Arc<InspectionService<R, G>>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<ExpiredFlagUpdate>,
) -> Response
where
    R: SessionRepository + 'static,
    G: SubmissionGateway + 'static,
{
    let result =
        service.record_expired_flag(&SessionId(session_id), &update.question_id, update.expired);
    snapshot_response(result)
}

pub(crate) async fn check_handler<R, G>(
    State(service): State<Arc<InspectionService<R, G>>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<CheckUpdate>,
) -> Response
where
    R: SessionRepository + 'static,
    G: SubmissionGateway + 'static,
{
    let result = service.record_check(&SessionId(session_id), update.action, update.checked);
    snapshot_response(result)
}

pub(crate) async fn submit_handler<R, G>(
    State(service): State<Arc<InspectionService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: SubmissionGateway + 'static,
{
    match service.submit(&SessionId(session_id)) {
        Ok(payload) => (StatusCode::ACCEPTED, axum::Json(payload)).into_response(),
        Err(error) => error_response(error),
    }
}

fn snapshot_response(
    result: Result<super::session::ChecklistSnapshot, InspectionServiceError>,
) -> Response {
    match result {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: InspectionServiceError) -> Response {
    let status = match &error {
        InspectionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        InspectionServiceError::Repository(RepositoryError::Conflict)
        | InspectionServiceError::AlreadySubmitted => StatusCode::CONFLICT,
        InspectionServiceError::ChecklistIncomplete { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        InspectionServiceError::Submission(_) => StatusCode::BAD_GATEWAY,
        InspectionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
