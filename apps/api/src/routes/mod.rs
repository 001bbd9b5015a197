pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        // Wizard steps
        .route("/api/v1/sessions/:id/start", post(handlers::handle_start))
        .route("/api/v1/sessions/:id/intake", post(handlers::handle_intake))
        .route(
            "/api/v1/sessions/:id/review",
            patch(handlers::handle_edit_review),
        )
        .route(
            "/api/v1/sessions/:id/strategy",
            post(handlers::handle_strategy),
        )
        .route("/api/v1/sessions/:id/refine", post(handlers::handle_refine))
        .route("/api/v1/sessions/:id/reset", post(handlers::handle_reset))
        .route(
            "/api/v1/sessions/:id/dismiss-error",
            post(handlers::handle_dismiss_error),
        )
        // Preview
        .route("/api/v1/sessions/:id/pages", get(handlers::handle_pages))
        .route("/api/v1/layout/anchor", post(handlers::handle_anchor))
        .with_state(state)
}
