use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::upload::SelectedFile;
use crate::profile::models::ProfileField;
use crate::state::AppState;
use crate::workflow::machine::WorkflowSnapshot;
use crate::workflow::session::WorkflowSession;

#[derive(Serialize)]
pub struct CreateWorkflowResponse {
    pub id: Uuid,
    pub snapshot: WorkflowSnapshot,
}

#[derive(Deserialize)]
pub struct FieldEdit {
    pub field: ProfileField,
    pub value: String,
}

#[derive(Deserialize)]
pub struct ListEdit {
    pub text: String,
}

async fn session(state: &AppState, id: Uuid) -> Result<Arc<WorkflowSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Workflow session {id} not found")))
}

/// POST /api/v1/workflows
pub async fn handle_create(State(state): State<AppState>) -> Json<CreateWorkflowResponse> {
    let (id, session) = state
        .sessions
        .create(state.parse.clone(), state.store.clone())
        .await;
    Json(CreateWorkflowResponse {
        id,
        snapshot: session.snapshot().await,
    })
}

/// GET /api/v1/workflows/:id
pub async fn handle_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(session(&state, id).await?.snapshot().await))
}

/// DELETE /api/v1/workflows/:id
/// Destroys the session; in-progress state is not preserved.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Workflow session {id} not found")))
    }
}

/// POST /api/v1/workflows/:id/file
/// Multipart body with one part named `resume`.
pub async fn handle_select_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    let session = session(&state, id).await?;

    let mut file: Option<SelectedFile> = None;
    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if part.name() == Some("resume") {
            let file_name = part.file_name().unwrap_or("resume").to_string();
            let content_type = part
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = part
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file part: {e}")))?;
            file = Some(SelectedFile {
                file_name,
                content_type,
                bytes,
            });
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("No file part named 'resume'".to_string()))?;
    Ok(Json(session.select_file(file).await))
}

/// POST /api/v1/workflows/:id/upload
pub async fn handle_submit_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(session(&state, id).await?.submit_upload().await?))
}

/// PATCH /api/v1/workflows/:id/profile
pub async fn handle_edit_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldEdit>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(
        session(&state, id)
            .await?
            .edit_field(req.field, &req.value)
            .await?,
    ))
}

/// PATCH /api/v1/workflows/:id/profile/skills
pub async fn handle_edit_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ListEdit>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(session(&state, id).await?.edit_skills(&req.text).await?))
}

/// PATCH /api/v1/workflows/:id/profile/languages
pub async fn handle_edit_languages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ListEdit>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(
        session(&state, id)
            .await?
            .edit_programming_languages(&req.text)
            .await?,
    ))
}

/// POST /api/v1/workflows/:id/save
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(session(&state, id).await?.submit_review().await?))
}

/// POST /api/v1/workflows/:id/cancel
pub async fn handle_cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(session(&state, id).await?.cancel_review().await))
}
