use crate::optimization::orchestrator::Collaborators;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Collaborators handed to every new session's orchestrator. The project
    /// analyzer is chosen at startup from `ENABLE_ADVANCED_PROJECT_SCORING`.
    pub services: Collaborators,
}
