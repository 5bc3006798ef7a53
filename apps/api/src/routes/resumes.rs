use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;

/// GET /api/v1/resumes
/// Thin proxy over the storage backend's listing endpoint.
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeRecord>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// GET /api/v1/resumes/:id/download
/// Streams the original document back with an attachment disposition.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let body = state.store.download(id).await?;
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=resume_{id}.pdf"),
        ),
    ];
    Ok((headers, body).into_response())
}
