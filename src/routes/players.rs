use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::player::{CheckNameResponse, CreatePlayerRequest, PlayerResponse},
    error::AppError,
    services::player_service,
    state::SharedState,
};

/// Player registration and lookup endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route("/players/{id}", get(get_player).delete(delete_player))
        .route("/players/check-name/{name}", get(check_name))
}

/// List every registered player.
#[utoipa::path(
    get,
    path = "/players",
    tag = "players",
    responses((status = 200, description = "List registered players", body = [PlayerResponse]))
)]
pub async fn list_players(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PlayerResponse>>, AppError> {
    Ok(Json(player_service::list_players(&state).await?))
}

/// Register a new player; duplicate names are rejected with a friendly error.
#[utoipa::path(
    post,
    path = "/players",
    tag = "players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Player created", body = PlayerResponse),
        (status = 400, description = "Invalid or already taken name")
    )
)]
pub async fn create_player(
    State(state): State<SharedState>,
    Json(payload): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), AppError> {
    payload.validate()?;
    let player = player_service::create_player(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// Retrieve a player by id.
#[utoipa::path(
    get,
    path = "/players/{id}",
    tag = "players",
    params(("id" = Uuid, Path, description = "Identifier of the player")),
    responses(
        (status = 200, description = "Player", body = PlayerResponse),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn get_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerResponse>, AppError> {
    Ok(Json(player_service::get_player(&state, id).await?))
}

/// Delete a player together with their games and progress.
#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "players",
    params(("id" = Uuid, Path, description = "Identifier of the player")),
    responses(
        (status = 204, description = "Player deleted"),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    player_service::delete_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Probe whether a player name is already taken.
#[utoipa::path(
    get,
    path = "/players/check-name/{name}",
    tag = "players",
    params(("name" = String, Path, description = "Name to probe")),
    responses((status = 200, description = "Availability of the name", body = CheckNameResponse))
)]
pub async fn check_name(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<CheckNameResponse>, AppError> {
    Ok(Json(player_service::check_name(&state, &name).await?))
}
