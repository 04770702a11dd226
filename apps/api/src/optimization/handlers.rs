//! Optimization routes: submit the intake and read the entitlement.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::account::auth::RequestIdentity;
use crate::errors::AppError;
use crate::optimization::orchestrator::RunOutcome;
use crate::sessions::{session_response, Session};
use crate::state::AppState;

/// Maps a run outcome onto the HTTP contract. Sign-in and upgrade become
/// 401 / 402; a failed run is a normal resting state and returns 200 with
/// `last_error` in the snapshot.
pub fn outcome_response(session: &Session, outcome: RunOutcome) -> Result<Json<Value>, AppError> {
    match outcome {
        RunOutcome::SignInRequired => Err(AppError::SignInRequired),
        RunOutcome::UpgradeRequired { remaining } => Err(AppError::UpgradeRequired { remaining }),
        outcome => session_response(session, json!(outcome)),
    }
}

/// POST /api/v1/sessions/:id/optimize
///
/// Packages the intake into a request and starts a run. Returns once the
/// run pauses for project review (or fails).
pub async fn handle_optimize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    identity: RequestIdentity,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let request = session.intake.submit()?;
    info!(
        session_id = %id,
        category = request.user_category.as_str(),
        target_role = %request.target_role,
        roles = session.intake.roles().len(),
        "optimization submitted"
    );

    let outcome = session.orchestrator.submit(&identity, request).await?;
    info!(session_id = %id, phase = ?session.orchestrator.phase(), "optimization step finished");
    outcome_response(&session, outcome)
}

/// GET /api/v1/sessions/:id/entitlement
pub async fn handle_entitlement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    identity: RequestIdentity,
) -> Result<Json<Value>, AppError> {
    let mut session = state.sessions.lock(id).await?;
    let entitlement = session
        .orchestrator
        .refresh_entitlement(&identity)
        .await
        .ok_or(AppError::SignInRequired)?;
    Ok(Json(json!({ "entitlement": entitlement })))
}
