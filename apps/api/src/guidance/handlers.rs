//! Axum route handlers for the guidance API.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::guidance::envelope::{decode_object, extract_envelope};
use crate::guidance::prompts::{
    GUIDANCE_PROMPT_TEMPLATE, GUIDANCE_SYSTEM, RECOMMENDATIONS_PROMPT_TEMPLATE,
};
use crate::guidance::{GuidanceEnvelope, JobRecommendation, GUIDANCE_FIELDS};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GuidanceRequest {
    pub program: String,
}

/// POST /career_guidance
///
/// Returns the four-category guidance envelope for a program of study.
/// Per-field problems in the model output are defaulted; only an
/// undecodable top-level document is an error.
pub async fn handle_career_guidance(
    State(state): State<AppState>,
    Json(request): Json<GuidanceRequest>,
) -> Result<Json<GuidanceEnvelope>, AppError> {
    let program = request.program.trim().to_string();
    validate_program(&program)?;

    let prompt = GUIDANCE_PROMPT_TEMPLATE.replace("{program}", &program);
    let text = state
        .llm
        .call_text(&prompt, GUIDANCE_SYSTEM)
        .await
        .map_err(|e| AppError::Model(format!("career guidance generation failed: {e}")))?;

    let fields = extract_envelope(&text, &GUIDANCE_FIELDS, &program)?;
    let envelope = GuidanceEnvelope::from_fields(fields);

    if envelope.total_items() < GUIDANCE_FIELDS.len() {
        return Err(AppError::PartialData(
            "Insufficient career guidance data generated. Please try again.".to_string(),
        ));
    }

    info!(
        "career guidance generated for '{program}' ({} items)",
        envelope.total_items()
    );
    Ok(Json(envelope))
}

/// POST /get_recommendations
///
/// Returns a list of structured job records for a program of study. A
/// missing or non-list `jobs` value degrades to an empty list; only an
/// undecodable document is an error.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(request): Json<GuidanceRequest>,
) -> Result<Json<Vec<JobRecommendation>>, AppError> {
    let program = request.program.trim().to_string();
    if program.is_empty() {
        return Err(AppError::Validation(
            "Program field is required and cannot be empty".to_string(),
        ));
    }

    let prompt = RECOMMENDATIONS_PROMPT_TEMPLATE.replace("{program}", &program);
    let text = state
        .llm
        .call_text(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Model(format!("recommendations generation failed: {e}")))?;

    let value = decode_object(&text)?;
    let jobs = match value.get("jobs") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|e| serde_json::from_value(e.clone()).ok())
            .collect(),
        Some(_) => {
            warn!("'jobs' field in model response was not a list");
            Vec::new()
        }
        None => {
            warn!("model response carried no 'jobs' field");
            Vec::new()
        }
    };

    info!("{} job recommendations generated for '{program}'", jobs.len());
    Ok(Json(jobs))
}

fn validate_program(program: &str) -> Result<(), AppError> {
    if program.is_empty() {
        return Err(AppError::Validation(
            "Program field is required and cannot be empty".to_string(),
        ));
    }
    if program.chars().count() < 2 {
        return Err(AppError::Validation(
            "Program field must be at least 2 characters long".to_string(),
        ));
    }
    if program.chars().count() > 100 {
        return Err(AppError::Validation(
            "Program field must be less than 100 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_program_rejects_empty() {
        assert!(validate_program("").is_err());
    }

    #[test]
    fn test_validate_program_rejects_single_char() {
        assert!(validate_program("x").is_err());
    }

    #[test]
    fn test_validate_program_rejects_over_100_chars() {
        let long = "a".repeat(101);
        assert!(validate_program(&long).is_err());
    }

    #[test]
    fn test_validate_program_accepts_normal_input() {
        assert!(validate_program("Computer Science").is_ok());
        assert!(validate_program(&"a".repeat(100)).is_ok());
    }
}
