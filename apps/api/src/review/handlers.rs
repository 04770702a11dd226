//! Project review routes. Valid only while the run is paused in project review.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::optimization::handlers::outcome_response;
use crate::sessions::session_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToggleRequest {
    /// Replacement offered for the unsuitable project `title`.
    Replacement { title: String },
    Suggestion { title: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManualDraftPatch {
    pub title: Option<String>,
    pub add_tech: Vec<String>,
    pub remove_tech: Vec<String>,
}

/// POST /api/v1/sessions/:id/review/toggle
pub async fn handle_toggle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let review = session.orchestrator.review_mut()?;
    let selected = match &request {
        ToggleRequest::Replacement { title } => review.toggle_replacement(title)?,
        ToggleRequest::Suggestion { title } => review.toggle_suggestion(title)?,
    };
    let selected_count = review.selected_count();
    session_response(
        &session,
        json!({ "selected": selected, "selected_count": selected_count }),
    )
}

/// PATCH /api/v1/sessions/:id/review/manual
pub async fn handle_update_manual(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ManualDraftPatch>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let review = session.orchestrator.review_mut()?;
    if let Some(title) = patch.title {
        review.set_manual_title(title);
    }
    for tech in &patch.remove_tech {
        review.remove_tech(tech);
    }
    for tech in &patch.add_tech {
        review.add_tech(tech);
    }
    let draft = json!(review.manual_draft());
    session_response(&session, json!({ "manual_draft": draft }))
}

/// POST /api/v1/sessions/:id/review/manual/bullets
pub async fn handle_generate_bullets(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let outcome = session.orchestrator.generate_manual_bullets().await?;
    outcome_response(&session, outcome)
}

/// POST /api/v1/sessions/:id/review/manual/add
pub async fn handle_add_manual(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let review = session.orchestrator.review_mut()?;
    review.add_manual_project()?;
    let selected_count = review.selected_count();
    session_response(&session, json!({ "selected_count": selected_count }))
}

/// POST /api/v1/sessions/:id/review/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let outcome = session.orchestrator.apply_project_review().await?;
    outcome_response(&session, outcome)
}

/// POST /api/v1/sessions/:id/review/dismiss
pub async fn handle_dismiss(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let outcome = session.orchestrator.dismiss_project_review().await?;
    outcome_response(&session, outcome)
}
