//! HTTP surface for Rusty Roster.
//!
//! This module exposes a compact Axum router over the student service:
//!
//! - `POST /student` – Store a new record (`id` required) and echo the full collection.
//! - `GET /student/:id` – Fetch a single record.
//! - `GET /students` – Fetch every record; an empty roster answers 404.
//! - `PUT /student/:id` – Partially update a record. Empty strings and a zero age mean "no change".
//! - `DELETE /student/:id` – Remove a record.
//! - `GET /student/:id/summary` – Ask the generation runtime for a three-sentence summary.
//! - `GET /metrics` – Observe mutation and summary counters.
//!
//! Successful payloads are wrapped under `"success"` (or `"summary"`), failures under `"error"`.

use crate::service::{ServiceError, StudentApi};
use crate::store::{StoreError, StudentPatch, StudentRecord};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the HTTP router exposing the student API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: StudentApi + 'static,
{
    Router::new()
        .route("/student", post(create_student::<S>))
        .route(
            "/student/:id",
            get(get_student::<S>)
                .put(update_student::<S>)
                .delete(delete_student::<S>),
        )
        .route("/student/:id/summary", get(summarize_student::<S>))
        .route("/students", get(list_students::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Success envelope shared by the CRUD endpoints.
#[derive(Serialize)]
struct Success<T> {
    success: T,
}

/// Response body for `GET /student/:id/summary`.
#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

/// Store a new student record.
async fn create_student<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<StudentRecord>, JsonRejection>,
) -> Result<Json<Success<Vec<StudentRecord>>>, AppError>
where
    S: StudentApi,
{
    let Json(record) = payload?;
    let id = record.id;
    let records = service.create_student(record).await?;
    tracing::info!(id, total = records.len(), "Student created");
    Ok(Json(Success { success: records }))
}

/// Fetch a single student record.
async fn get_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Success<StudentRecord>>, AppError>
where
    S: StudentApi,
{
    let id = parse_id(&raw_id)?;
    let record = service.get_student(id).await?;
    Ok(Json(Success { success: record }))
}

/// Fetch every student record.
async fn list_students<S>(
    State(service): State<Arc<S>>,
) -> Result<Json<Success<Vec<StudentRecord>>>, AppError>
where
    S: StudentApi,
{
    let records = service.list_students().await?;
    Ok(Json(Success { success: records }))
}

/// Apply a partial update to a student record.
async fn update_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<StudentPatch>, JsonRejection>,
) -> Result<Json<Success<&'static str>>, AppError>
where
    S: StudentApi,
{
    let id = parse_id(&raw_id)?;
    let Json(patch) = payload?;
    service.update_student(id, patch).await?;
    tracing::info!(id, "Student updated");
    Ok(Json(Success {
        success: "Student updated",
    }))
}

/// Remove a student record.
async fn delete_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Success<&'static str>>, AppError>
where
    S: StudentApi,
{
    let id = parse_id(&raw_id)?;
    service.delete_student(id).await?;
    tracing::info!(id, "Student deleted");
    Ok(Json(Success {
        success: "Student deleted",
    }))
}

/// Generate a natural-language summary of a student.
async fn summarize_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: StudentApi,
{
    let id = parse_id(&raw_id)?;
    let summary = service.summarize_student(id).await?;
    Ok(Json(SummaryResponse { summary }))
}

/// Return the metrics snapshot.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> impl IntoResponse
where
    S: StudentApi,
{
    Json(service.metrics_snapshot())
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid student ID".into()))
}

enum AppError {
    BadRequest(String),
    Service(ServiceError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::Store(error)) => match error {
                StoreError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                StoreError::NotFound(_) | StoreError::Empty => StatusCode::NOT_FOUND,
            },
            Self::Service(ServiceError::Summarization(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(message) => message,
            Self::Service(error) => error.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(inner: ServiceError) -> Self {
        Self::Service(inner)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
