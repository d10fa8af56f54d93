pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Architecture API
        .route("/api/v1/architectures", post(handlers::handle_generate))
        .route(
            "/api/v1/architectures/refine",
            post(handlers::handle_refine),
        )
        .route(
            "/api/v1/architectures/regenerate-shots",
            post(handlers::handle_regenerate_shots),
        )
        .with_state(state)
}
