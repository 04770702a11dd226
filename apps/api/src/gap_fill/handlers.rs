//! Gap-fill routes. Valid only while the run is paused in the gap check.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::gap_fill::form::GapEntry;
use crate::optimization::completeness::SectionKind;
use crate::optimization::handlers::outcome_response;
use crate::optimization::orchestrator::GapFillProgress;
use crate::sessions::session_response;
use crate::state::AppState;

/// POST /api/v1/sessions/:id/gaps/entries
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(entry): Json<GapEntry>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    session.orchestrator.gap_form_mut()?.add_entry(entry)?;
    session_response(&session, Value::Null)
}

/// PUT /api/v1/sessions/:id/gaps/entries/:index
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(entry): Json<GapEntry>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    session
        .orchestrator
        .gap_form_mut()?
        .update_entry(index, entry)?;
    session_response(&session, Value::Null)
}

/// DELETE /api/v1/sessions/:id/gaps/entries/:section/:index
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((id, section, index)): Path<(Uuid, SectionKind, usize)>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let removed = session
        .orchestrator
        .gap_form_mut()?
        .remove_entry(section, index)?;
    session_response(&session, json!({ "removed": removed }))
}

/// POST /api/v1/sessions/:id/gaps/next
///
/// On the last section this merges the entries and finalizes the run.
pub async fn handle_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    match session.orchestrator.advance_gap_fill().await? {
        GapFillProgress::Blocked => session_response(&session, json!({ "advanced": false })),
        GapFillProgress::Moved => session_response(&session, json!({ "advanced": true })),
        GapFillProgress::Finished(outcome) => outcome_response(&session, outcome),
    }
}

/// POST /api/v1/sessions/:id/gaps/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let moved = session.orchestrator.retreat_gap_fill()?;
    session_response(&session, json!({ "moved": moved }))
}
