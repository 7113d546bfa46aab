use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Game lifecycle endpoints.
pub mod game;
/// Health check endpoint.
pub mod health;
/// Cron and task queue triggers.
pub mod jobs;
/// Score endpoints.
pub mod score;
/// User endpoints.
pub mod user;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(user::router())
        .merge(game::router())
        .merge(score::router())
        .merge(jobs::router())
        .merge(docs::router())
        .with_state(state)
}
