use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document routes.
pub mod docs;
/// Completed-game routes.
pub mod games;
/// Health check routes.
pub mod health;
/// Player registration and lookup routes.
pub mod players;
/// Progress persistence routes.
pub mod progress;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(players::router())
        .merge(games::router())
        .merge(progress::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
