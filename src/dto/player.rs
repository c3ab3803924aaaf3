//! DTO definitions for player registration and lookup.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::PlayerEntity,
    dto::{format_system_time, validation::validate_player_name},
};

/// Payload used to register a new player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePlayerRequest {
    /// Desired display name, unique across all players.
    #[validate(custom(function = validate_player_name))]
    pub name: String,
}

/// Player record as exposed over the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerResponse {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Registration timestamp (RFC 3339).
    pub created_at: String,
}

impl From<PlayerEntity> for PlayerResponse {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            created_at: format_system_time(value.created_at),
        }
    }
}

/// Result of a name-availability probe.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckNameResponse {
    /// Whether a player with the probed name already exists.
    pub exists: bool,
}
