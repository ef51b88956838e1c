mod handlers;
mod models;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use models::{
    ErrorResponse, HealthResponse, MessageResponse, ReportRequest, ReportResponse, UploadRequest,
    UploadResponse,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/questions", get(handlers::list_questions))
        .route(
            "/questions/{id}",
            get(handlers::get_question).delete(handlers::delete_question),
        )
        .route("/questions/{id}/report", post(handlers::report_correction))
        .fallback(handlers::not_found)
        .with_state(state)
}
