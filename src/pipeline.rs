use crate::api::UploadRequest;
use crate::error::AppError;
use crate::generator::{AnswerGenerator, GeneratedAnswer};
use crate::model::NewQuestion;
use crate::store::QuestionRepository;
use crate::validation::validate_upload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub question_id: i64,
    pub result: GeneratedAnswer,
}

/// Validates, asks the provider, then stores the question.
///
/// Nothing is written unless both validation and generation succeed.
pub async fn submit(
    store: &dyn QuestionRepository,
    generator: &AnswerGenerator,
    request: UploadRequest,
) -> Result<Submission, AppError> {
    let validated = validate_upload(request)?;

    let preview: String = validated.question.chars().take(50).collect();
    tracing::info!(question = %preview, "processing question");

    let result = generator
        .generate(&validated.question, &validated.choices)
        .await?;

    let question_id = store
        .create(NewQuestion {
            question_text: validated.question,
            choices: validated.choices,
            predicted_answer: result.answer,
            explanation: result.explanation.clone(),
        })
        .await?;

    tracing::info!(question_id, answer = %result.answer, "question saved");

    Ok(Submission {
        question_id,
        result,
    })
}
