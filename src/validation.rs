use crate::api::{ReportRequest, UploadRequest};
use crate::error::AppError;
use crate::model::AnswerLetter;

/// A submission whose shape has been checked. Text and choices are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    pub question: String,
    pub choices: [String; 4],
}

pub fn validate_upload(request: UploadRequest) -> Result<ValidatedQuestion, AppError> {
    let question = request
        .question
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty());

    let (Some(question), Some(choices)) = (question, request.choices) else {
        return Err(invalid_shape());
    };

    let choices: [String; 4] = choices.try_into().map_err(|_| invalid_shape())?;
    let choices = choices.map(|choice| choice.trim().to_string());
    if choices.iter().any(String::is_empty) {
        return Err(AppError::InvalidInput(
            "All choices must be non-empty.".to_string(),
        ));
    }

    Ok(ValidatedQuestion { question, choices })
}

pub fn validate_correction(request: &ReportRequest) -> Result<AnswerLetter, AppError> {
    request
        .correction
        .as_deref()
        .and_then(|c| c.parse::<AnswerLetter>().ok())
        .ok_or_else(|| {
            AppError::InvalidInput("Correction must be one of 'A', 'B', 'C', or 'D'.".to_string())
        })
}

fn invalid_shape() -> AppError {
    AppError::InvalidInput(
        "Invalid input. 'question' and exactly 4 'choices' are required.".to_string(),
    )
}
