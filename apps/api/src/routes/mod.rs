pub mod health;
pub mod resumes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::models::upload::MAX_UPLOAD_BYTES;
use crate::state::AppState;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Upload workflow sessions
        .route("/api/v1/workflows", post(handlers::handle_create))
        .route(
            "/api/v1/workflows/:id",
            get(handlers::handle_snapshot).delete(handlers::handle_delete),
        )
        .route(
            "/api/v1/workflows/:id/file",
            post(handlers::handle_select_file),
        )
        .route(
            "/api/v1/workflows/:id/upload",
            post(handlers::handle_submit_upload),
        )
        .route(
            "/api/v1/workflows/:id/profile",
            patch(handlers::handle_edit_field),
        )
        .route(
            "/api/v1/workflows/:id/profile/skills",
            patch(handlers::handle_edit_skills),
        )
        .route(
            "/api/v1/workflows/:id/profile/languages",
            patch(handlers::handle_edit_languages),
        )
        .route("/api/v1/workflows/:id/save", post(handlers::handle_save))
        .route(
            "/api/v1/workflows/:id/cancel",
            post(handlers::handle_cancel),
        )
        // Read-only listing proxy
        .route("/api/v1/resumes", get(resumes::handle_list))
        .route(
            "/api/v1/resumes/:id/download",
            get(resumes::handle_download),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
