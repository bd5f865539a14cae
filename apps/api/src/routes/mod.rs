pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::cv::handlers as cv;
use crate::guidance::handlers as guidance;
use crate::interview::handlers as interview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/interview-questions",
            post(interview::handle_interview_questions),
        )
        .route("/career_guidance", post(guidance::handle_career_guidance))
        .route("/get_recommendations", post(guidance::handle_recommendations))
        .route("/generate-cv", post(cv::handle_generate_cv))
        .route("/download-cv/:filename", get(cv::handle_download_cv))
        .with_state(state)
}
