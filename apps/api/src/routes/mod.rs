pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::wizard::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Guided Section Generator wizard
        .route("/api/v1/wizard/start", post(handlers::handle_start))
        .route("/api/v1/wizard/:session_id", get(handlers::handle_get_session))
        .route(
            "/api/v1/wizard/:session_id/answer",
            post(handlers::handle_answer),
        )
        .route(
            "/api/v1/wizard/:session_id/previous",
            post(handlers::handle_previous),
        )
        .with_state(state)
}
