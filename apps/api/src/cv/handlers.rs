//! Axum route handlers for CV generation and download.

use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cv::models::CvData;
use crate::cv::pdf::render_cv;
use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::StorageError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCvResponse {
    pub success: bool,
    pub filename: String,
    pub download_url: String,
    pub message: String,
}

/// POST /generate-cv
///
/// Renders a CV PDF from form data and stores it under a unique filename.
/// The file stays available until the retention scheduler reclaims it.
pub async fn handle_generate_cv(
    State(state): State<AppState>,
    Json(data): Json<CvData>,
) -> Result<impl IntoResponse, AppError> {
    if data.name.trim().is_empty() {
        return Err(AppError::Validation(
            "Name is required for CV generation".to_string(),
        ));
    }

    let bytes = render_cv(&data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CV rendering failed: {e}")))?;

    let filename = format!("cv_{}.pdf", Uuid::new_v4().simple());
    let path = state.config.storage_dir.join(&filename);
    state.storage.write(&path, Bytes::from(bytes)).await?;

    info!("generated CV {filename} for '{}'", data.name);
    Ok((
        StatusCode::CREATED,
        Json(GenerateCvResponse {
            success: true,
            download_url: format!("/download-cv/{filename}"),
            filename,
            message: "CV generated successfully. Use the downloadUrl to retrieve it.".to_string(),
        }),
    ))
}

/// GET /download-cv/:filename
///
/// Serves a previously generated CV as an attachment. The scheduler may
/// delete a file between generation and download; that race surfaces here
/// as a plain 404.
pub async fn handle_download_cv(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> Result<Response, AppError> {
    if !is_safe_cv_filename(&filename) {
        warn!("attempted download with invalid filename: {filename}");
        return Err(AppError::Validation("Invalid filename provided".to_string()));
    }

    let path = state.config.storage_dir.join(&filename);
    let bytes = match state.storage.read(&path).await {
        Ok(bytes) => bytes,
        Err(StorageError::NotFound(_)) => {
            warn!("attempted to download non-existent CV: {filename}");
            return Err(AppError::NotFound("CV not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let download_name = format!("cv_{}.pdf", Utc::now().format("%Y%m%d"));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{download_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Guards against path traversal: generated names are flat `*.pdf` files.
fn is_safe_cv_filename(filename: &str) -> bool {
    filename.ends_with(".pdf")
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
}
