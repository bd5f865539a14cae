//! Axum route handlers for the interview questions API.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::errors::AppError;
use crate::interview::parser::{parse_questions_and_tips, QuestionRecord};
use crate::interview::prompts::{INTERVIEW_QUESTIONS_PROMPT_TEMPLATE, INTERVIEW_SYSTEM};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InterviewQuestionsRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewQuestionsResponse {
    pub questions: Vec<QuestionRecord>,
}

/// POST /interview-questions
///
/// Generates interview questions with answer tips for a role. The model's
/// text goes through the tiered parser, which always yields a schema-valid
/// result. A failed model call returns an error body that still carries an
/// empty `questions` list so the frontend never sees a missing field.
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    Json(request): Json<InterviewQuestionsRequest>,
) -> Result<Response, AppError> {
    let role = request.role.trim().to_string();
    if role.is_empty() {
        return Err(AppError::Validation(
            "Role is required to generate interview questions".to_string(),
        ));
    }

    let prompt = INTERVIEW_QUESTIONS_PROMPT_TEMPLATE.replace("{role}", &role);

    let text = match state.llm.call_text(&prompt, INTERVIEW_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            error!("interview question generation failed for role '{role}': {e}");
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to generate interview questions at this time. Please try again later.",
                    "questions": []
                })),
            )
                .into_response());
        }
    };

    let questions = parse_questions_and_tips(&text, &role);
    info!("parsed {} interview questions for role '{role}'", questions.len());

    Ok(Json(InterviewQuestionsResponse { questions }).into_response())
}
