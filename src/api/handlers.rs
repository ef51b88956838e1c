use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::AppError;
use crate::model::Question;
use crate::pipeline;
use crate::validation::validate_correction;
use crate::AppState;

use super::models::{
    ErrorResponse, HealthResponse, MessageResponse, ReportRequest, ReportResponse, UploadRequest,
    UploadResponse,
};

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Question Answer API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn upload(
    State(state): State<AppState>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let submission = pipeline::submit(state.store.as_ref(), &state.generator, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Question saved successfully".to_string(),
            result: submission.result,
            question_id: submission.question_id,
        }),
    ))
}

pub async fn list_questions(State(state): State<AppState>) -> Result<Json<Vec<Question>>, AppError> {
    Ok(Json(state.store.list().await?))
}

pub async fn get_question(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Question>, AppError> {
    let id = question_id(id)?;
    Ok(Json(state.store.get(id).await?))
}

pub async fn delete_question(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = question_id(id)?;
    state.store.delete(id).await?;
    tracing::info!(question_id = id, "question deleted");

    Ok(Json(MessageResponse {
        message: "Question deleted successfully".to_string(),
    }))
}

pub async fn report_correction(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportResponse>, AppError> {
    let id = question_id(id)?;
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let correction = validate_correction(&request)?;

    state.store.update_correction(id, correction).await?;
    tracing::info!(question_id = id, %correction, "correction saved");

    Ok(Json(ReportResponse {
        message: "Correction saved.".to_string(),
        user_correction: correction,
    }))
}

/// Ids that do not parse as `i64` answer like an unknown route.
fn question_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| AppError::UnknownId(rejection.body_text()))
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
            kind: None,
        }),
    )
        .into_response()
}
