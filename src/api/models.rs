use serde::{Deserialize, Serialize};

use crate::generator::GeneratedAnswer;
use crate::model::AnswerLetter;

#[derive(Debug, Default, Deserialize)]
pub struct UploadRequest {
    pub question: Option<String>,
    pub choices: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub result: GeneratedAnswer,
    pub question_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    pub correction: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub message: String,
    pub user_correction: AnswerLetter,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
