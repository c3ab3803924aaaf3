//! DTO definitions for completed-game records.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{GameEntity, GameType},
    dto::format_system_time,
};

/// Session label applied when the client does not supply one.
pub const DEFAULT_GAME_NAME: &str = "Memory Match";

/// Payload recording one completed play session.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RecordGameRequest {
    /// Player who finished the session.
    pub player_id: Uuid,
    /// Variant that was played.
    pub game_type: GameType,
    /// Optional session label; defaults to "Memory Match".
    #[serde(default)]
    #[validate(length(max = 100))]
    pub game_name: Option<String>,
    /// Final score.
    pub score: i32,
}

/// Completed game as exposed over the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameResponse {
    /// Identifier of the game record.
    pub id: Uuid,
    /// Owning player.
    pub player_id: Uuid,
    /// Display name of the owning player.
    pub player_name: String,
    /// Raw variant tag, e.g. `CARD_GAME`.
    pub game_type: GameType,
    /// Human readable variant label.
    pub game_type_display: String,
    /// Session label.
    pub game_name: String,
    /// Final score.
    pub score: i32,
    /// Completion timestamp (RFC 3339).
    pub played_at: String,
}

impl GameResponse {
    /// Combine a stored game with its owner's display name.
    pub fn from_entity(game: GameEntity, player_name: String) -> Self {
        Self {
            id: game.id,
            player_id: game.player_id,
            player_name,
            game_type: game.game_type,
            game_type_display: game.game_type.display_name().to_owned(),
            game_name: game.game_name,
            score: game.score,
            played_at: format_system_time(game.played_at),
        }
    }
}
