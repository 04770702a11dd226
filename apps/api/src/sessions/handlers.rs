//! Session lifecycle routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::sessions::session_response;
use crate::state::AppState;

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let handle = state.sessions.create(state.services.clone()).await;
    let session = handle.lock().await;
    Ok((StatusCode::CREATED, session_response(&session, Value::Null)?))
}

/// GET /api/v1/sessions/:id
///
/// While another request is running a collaborator call, only the run phase
/// is reported so clients can show progress.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    match state.sessions.lock(id).await {
        Ok(session) => session_response(&session, Value::Null),
        Err(AppError::SessionBusy) => {
            let phase = state
                .sessions
                .phase(id)
                .await
                .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
            Ok(Json(json!({
                "result": { "busy": true },
                "session": {
                    "id": id,
                    "optimization": { "phase": phase }
                }
            })))
        }
        Err(e) => Err(e),
    }
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}
