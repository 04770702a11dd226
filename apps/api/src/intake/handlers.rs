//! Intake wizard routes. Every route edits the wizard of one session; none
//! of them reach an external service.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::upload::extract_resume_text_blocking;
use crate::models::role::RolePatch;
use crate::models::user::UserCategory;
use crate::sessions::session_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResumeTextRequest {
    pub resume_text: String,
    pub user_category: Option<UserCategory>,
}

/// PUT /api/v1/sessions/:id/intake/resume
pub async fn handle_set_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResumeTextRequest>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    session.intake.set_resume_text(request.resume_text);
    if let Some(category) = request.user_category {
        session.intake.set_user_category(category);
    }
    session_response(&session, Value::Null)
}

/// POST /api/v1/sessions/:id/intake/resume/upload
///
/// Multipart form: `file` (PDF or plain text) and optional `user_category`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut text = None;
    let mut category = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                text = Some(extract_resume_text_blocking(file_name, content_type, data).await?);
            }
            Some("user_category") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                category = Some(parse_category(&raw)?);
            }
            _ => {}
        }
    }

    let text = text.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    info!(session_id = %id, chars = text.len(), "resume uploaded");

    let mut session = state.sessions.lock(id).await?;
    session.intake.set_resume_text(text);
    if let Some(category) = category {
        session.intake.set_user_category(category);
    }
    session_response(&session, Value::Null)
}

fn parse_category(raw: &str) -> Result<UserCategory, AppError> {
    match raw.trim() {
        "fresher" => Ok(UserCategory::Fresher),
        "experienced" => Ok(UserCategory::Experienced),
        other => Err(AppError::Validation(format!(
            "Unknown user_category '{other}' (expected fresher or experienced)"
        ))),
    }
}

/// PATCH /api/v1/sessions/:id/intake/role
pub async fn handle_update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<RolePatch>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    session.intake.update_current_role(patch);
    session_response(&session, Value::Null)
}

/// POST /api/v1/sessions/:id/intake/next
///
/// Stays on the current step when it does not validate.
pub async fn handle_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let advanced = session.intake.advance();
    session_response(&session, json!({ "advanced": advanced }))
}

/// POST /api/v1/sessions/:id/intake/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let moved = session.intake.go_back();
    session_response(&session, json!({ "moved": moved }))
}

/// POST /api/v1/sessions/:id/intake/roles
pub async fn handle_add_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    session.intake.add_role();
    session_response(&session, Value::Null)
}

/// POST /api/v1/sessions/:id/intake/roles/:index/edit
pub async fn handle_edit_role(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    session.intake.edit_role(index)?;
    session_response(&session, Value::Null)
}

/// DELETE /api/v1/sessions/:id/intake/roles/:index
///
/// The last remaining role is never deleted.
pub async fn handle_delete_role(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let deleted = session.intake.delete_role(index)?;
    session_response(&session, json!({ "deleted": deleted }))
}
