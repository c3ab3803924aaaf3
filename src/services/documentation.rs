use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Memory Match backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::players::list_players,
        crate::routes::players::create_player,
        crate::routes::players::get_player,
        crate::routes::players::delete_player,
        crate::routes::players::check_name,
        crate::routes::games::list_games,
        crate::routes::games::record_game,
        crate::routes::games::get_game,
        crate::routes::games::delete_game,
        crate::routes::progress::get_progress,
        crate::routes::progress::save_progress,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::player::CreatePlayerRequest,
            crate::dto::player::PlayerResponse,
            crate::dto::player::CheckNameResponse,
            crate::dto::game::RecordGameRequest,
            crate::dto::game::GameResponse,
            crate::dto::progress::SaveProgressRequest,
            crate::dto::progress::ProgressResponse,
            crate::dao::models::GameType,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "players", description = "Player registration and lookup"),
        (name = "games", description = "Completed-game records"),
        (name = "game-progress", description = "Resumable in-flight session state"),
    )
)]
pub struct ApiDoc;
