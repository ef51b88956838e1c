use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::ErrorResponse;
use crate::generator::GenerationError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("question {0} not found")]
    NotFound(i64),
    #[error("no question route matches id {0:?}")]
    UnknownId(String),
    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Generation(err) if err.is_unavailable() => "generation_unavailable",
            Self::Generation(_) => "generation_parse_error",
            Self::NotFound(_) | Self::UnknownId(_) => "not_found",
            Self::Storage(_) => "storage_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::UnknownId(_) => StatusCode::NOT_FOUND,
            Self::Generation(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show callers. Server-side failures get a generic
    /// message; their details only go to the log.
    fn public_message(&self) -> String {
        match self {
            Self::InvalidInput(reason) => reason.clone(),
            Self::NotFound(_) => self.to_string(),
            Self::UnknownId(_) => "route not found".to_string(),
            Self::Generation(err) if err.is_unavailable() => {
                "Answer provider is unavailable".to_string()
            }
            Self::Generation(_) => "Answer provider returned an unusable response".to_string(),
            Self::Storage(_) => "Internal storage error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        } else {
            tracing::debug!(kind = self.kind(), error = %self, "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.public_message(),
                kind: Some(self.kind().to_string()),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err = AppError::from(StoreError::NotFound(3));
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_id_looks_like_a_missing_route() {
        let err = AppError::UnknownId("abc".to_string());
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "route not found");
    }

    #[test]
    fn generation_errors_split_by_cause() {
        let unavailable = AppError::from(GenerationError::Timeout(10));
        assert_eq!(unavailable.kind(), "generation_unavailable");
        assert_eq!(unavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let unparseable = AppError::from(GenerationError::NoAnswerLetter("maybe".to_string()));
        assert_eq!(unparseable.kind(), "generation_parse_error");
        assert_eq!(unparseable.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn storage_details_stay_out_of_the_body() {
        let err = AppError::from(StoreError::Corrupt {
            id: 1,
            reason: "secret detail".to_string(),
        });
        assert_eq!(err.kind(), "storage_error");
        assert!(!err.public_message().contains("secret"));
    }
}
