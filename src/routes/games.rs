use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::game::{GameResponse, RecordGameRequest},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Completed-game endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(record_game))
        .route("/games/{id}", get(get_game).delete(delete_game))
}

/// Optional filter applied to the games listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListGamesQuery {
    /// Restrict the listing to one player's games.
    pub player_id: Option<Uuid>,
}

/// List completed games, most recent first.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(ListGamesQuery),
    responses((status = 200, description = "Completed games, most recent first", body = [GameResponse]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    Ok(Json(game_service::list_games(&state, query.player_id).await?))
}

/// Record one completed play session.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = RecordGameRequest,
    responses(
        (status = 201, description = "Game recorded", body = GameResponse),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn record_game(
    State(state): State<SharedState>,
    Json(payload): Json<RecordGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    payload.validate()?;
    let game = game_service::record_game(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// Retrieve a completed game by id.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game", body = GameResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::get_game(&state, id).await?))
}

/// Delete a completed game record.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Identifier of the game")),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    game_service::delete_game(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
