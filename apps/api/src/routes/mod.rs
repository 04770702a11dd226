pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::intake::upload::MAX_UPLOAD_BYTES;
use crate::state::AppState;
use crate::{gap_fill, intake, optimization, review, sessions};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route(
            "/api/v1/sessions",
            post(sessions::handlers::handle_create_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handlers::handle_get_session)
                .delete(sessions::handlers::handle_delete_session),
        )
        // Intake
        .route(
            "/api/v1/sessions/:id/intake/resume",
            put(intake::handlers::handle_set_resume),
        )
        .route(
            "/api/v1/sessions/:id/intake/resume/upload",
            post(intake::handlers::handle_upload_resume)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .route(
            "/api/v1/sessions/:id/intake/role",
            patch(intake::handlers::handle_update_role),
        )
        .route(
            "/api/v1/sessions/:id/intake/next",
            post(intake::handlers::handle_next),
        )
        .route(
            "/api/v1/sessions/:id/intake/back",
            post(intake::handlers::handle_back),
        )
        .route(
            "/api/v1/sessions/:id/intake/roles",
            post(intake::handlers::handle_add_role),
        )
        .route(
            "/api/v1/sessions/:id/intake/roles/:index/edit",
            post(intake::handlers::handle_edit_role),
        )
        .route(
            "/api/v1/sessions/:id/intake/roles/:index",
            delete(intake::handlers::handle_delete_role),
        )
        // Optimization
        .route(
            "/api/v1/sessions/:id/optimize",
            post(optimization::handlers::handle_optimize),
        )
        .route(
            "/api/v1/sessions/:id/entitlement",
            get(optimization::handlers::handle_entitlement),
        )
        // Project review
        .route(
            "/api/v1/sessions/:id/review/toggle",
            post(review::handlers::handle_toggle),
        )
        .route(
            "/api/v1/sessions/:id/review/manual",
            patch(review::handlers::handle_update_manual),
        )
        .route(
            "/api/v1/sessions/:id/review/manual/bullets",
            post(review::handlers::handle_generate_bullets),
        )
        .route(
            "/api/v1/sessions/:id/review/manual/add",
            post(review::handlers::handle_add_manual),
        )
        .route(
            "/api/v1/sessions/:id/review/apply",
            post(review::handlers::handle_apply),
        )
        .route(
            "/api/v1/sessions/:id/review/dismiss",
            post(review::handlers::handle_dismiss),
        )
        // Gap fill
        .route(
            "/api/v1/sessions/:id/gaps/entries",
            post(gap_fill::handlers::handle_add_entry),
        )
        .route(
            "/api/v1/sessions/:id/gaps/entries/:index",
            put(gap_fill::handlers::handle_update_entry),
        )
        .route(
            "/api/v1/sessions/:id/gaps/entries/:section/:index",
            delete(gap_fill::handlers::handle_remove_entry),
        )
        .route(
            "/api/v1/sessions/:id/gaps/next",
            post(gap_fill::handlers::handle_next),
        )
        .route(
            "/api/v1/sessions/:id/gaps/back",
            post(gap_fill::handlers::handle_back),
        )
        .with_state(state)
}
