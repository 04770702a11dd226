use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gap_fill::form::GapFillError;
use crate::intake::upload::UploadError;
use crate::intake::wizard::IntakeError;
use crate::llm_client::LlmError;
use crate::optimization::orchestrator::OrchestratorError;
use crate::review::reviewer::ReviewError;

/// Failure of an external collaborator (rewriter, scorer, analyzer, bullet
/// generator, entitlement service). The orchestrator catches these and turns
/// them into a user-facing message; they never reach a handler directly.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// Message shown to the user after `action` failed.
    pub fn user_message(&self, action: &str) -> String {
        match self {
            ServiceError::Timeout { .. } => {
                format!("{action} is taking too long. Please try again.")
            }
            _ => format!("{action} failed. Please try again."),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid phase: {0}")]
    InvalidPhase(String),

    #[error("Session busy")]
    SessionBusy,

    #[error("Sign in required")]
    SignInRequired,

    #[error("Upgrade required ({remaining} optimizations remaining)")]
    UpgradeRequired { remaining: u32 },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<IntakeError> for AppError {
    fn from(e: IntakeError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<ReviewError> for AppError {
    fn from(e: ReviewError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<GapFillError> for AppError {
    fn from(e: GapFillError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<OrchestratorError> for AppError {
    fn from(e: OrchestratorError) -> Self {
        match e {
            OrchestratorError::Review(inner) => inner.into(),
            OrchestratorError::GapFill(inner) => inner.into(),
            other => AppError::InvalidPhase(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidPhase(msg) => (StatusCode::CONFLICT, "INVALID_PHASE", msg.clone()),
            AppError::SessionBusy => (
                StatusCode::CONFLICT,
                "SESSION_BUSY",
                "An optimization step is already running for this session".to_string(),
            ),
            AppError::SignInRequired => (
                StatusCode::UNAUTHORIZED,
                "SIGN_IN_REQUIRED",
                "Please sign in to optimize your resume".to_string(),
            ),
            AppError::UpgradeRequired { remaining } => (
                StatusCode::PAYMENT_REQUIRED,
                "UPGRADE_REQUIRED",
                format!("No optimizations left ({remaining} remaining). Upgrade your plan to continue."),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_mentions_delay() {
        let e = ServiceError::Timeout {
            operation: "rewrite",
            seconds: 90,
        };
        assert!(e.user_message("Optimization").contains("taking too long"));
        assert_eq!(e.to_string(), "rewrite timed out after 90s");
    }

    #[test]
    fn test_generic_failure_message() {
        let e = ServiceError::InvalidResponse("missing project_analysis".to_string());
        assert_eq!(
            e.user_message("Project analysis"),
            "Project analysis failed. Please try again."
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::SignInRequired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::UpgradeRequired { remaining: 0 }
                .into_response()
                .status(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            AppError::SessionBusy.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
