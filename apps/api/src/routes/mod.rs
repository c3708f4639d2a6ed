pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::collaborators::handlers as collaborator_handlers;
use crate::evaluation;
use crate::form::handlers as form_handlers;
use crate::state::AppState;
use crate::theme;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Form sessions
        .route(
            "/api/v1/sessions",
            post(form_handlers::handle_create_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(form_handlers::handle_get_session).delete(form_handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/contact",
            put(form_handlers::handle_set_contact),
        )
        .route(
            "/api/v1/sessions/:id/summary",
            put(form_handlers::handle_set_summary),
        )
        .route(
            "/api/v1/sessions/:id/:list/entries",
            post(form_handlers::handle_append_entry),
        )
        .route(
            "/api/v1/sessions/:id/:list/entries/:index",
            put(form_handlers::handle_update_entry).delete(form_handlers::handle_remove_entry),
        )
        .route(
            "/api/v1/sessions/:id/submit",
            post(form_handlers::handle_submit),
        )
        .route(
            "/api/v1/sessions/:id/preview",
            post(form_handlers::handle_generate_preview).get(form_handlers::handle_get_preview),
        )
        // Collaborator-facing endpoints
        .route(
            "/api/v1/summary",
            post(collaborator_handlers::handle_generate_summary),
        )
        .route("/api/v1/evaluations", post(evaluation::handle_evaluate))
        // Client preferences
        .route(
            "/api/v1/preferences/theme",
            get(theme::handle_get_theme).put(theme::handle_put_theme),
        )
        .layer(DefaultBodyLimit::max(evaluation::UPLOAD_BODY_LIMIT))
        .with_state(state)
}
