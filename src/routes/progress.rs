use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::progress::{ProgressQuery, ProgressResponse, SaveProgressRequest},
    error::AppError,
    services::progress_service,
    state::SharedState,
};

/// Progress persistence endpoints, mirroring the paths the game clients use.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game-progress/get_progress", get(get_progress))
        .route("/game-progress/save_progress", post(save_progress))
}

/// Load the saved board state for one `(player_id, game_type)` pair.
#[utoipa::path(
    get,
    path = "/game-progress/get_progress",
    tag = "game-progress",
    params(ProgressQuery),
    responses(
        (status = 200, description = "Saved progress", body = ProgressResponse),
        (status = 400, description = "Missing player_id or game_type"),
        (status = 404, description = "No progress saved for this pair")
    )
)]
pub async fn get_progress(
    State(state): State<SharedState>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ProgressResponse>, AppError> {
    Ok(Json(progress_service::get_progress(&state, query).await?))
}

/// Save the current board state, creating or updating the unique record for
/// the `(player_id, game_type)` pair.
#[utoipa::path(
    post,
    path = "/game-progress/save_progress",
    tag = "game-progress",
    request_body = SaveProgressRequest,
    responses(
        (status = 200, description = "Upserted progress", body = ProgressResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn save_progress(
    State(state): State<SharedState>,
    Json(payload): Json<SaveProgressRequest>,
) -> Result<Json<ProgressResponse>, AppError> {
    payload.validate()?;
    Ok(Json(
        progress_service::save_progress(&state, payload).await?,
    ))
}
