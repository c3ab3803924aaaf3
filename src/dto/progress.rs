//! DTO definitions for the progress upsert endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{GameProgressEntity, GameType, ProgressPatch},
    dto::format_system_time,
};

/// Query identifying one progress record.
///
/// Both keys are required; they are modelled as options so their absence can
/// be reported as a 400 validation error instead of a generic rejection.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProgressQuery {
    /// Owning player.
    pub player_id: Option<Uuid>,
    /// Variant the progress belongs to.
    pub game_type: Option<GameType>,
}

/// Payload persisting the client's current board state.
///
/// Fields beyond the two keys are optional: omitted fields stay unchanged on
/// an existing record and take their documented defaults on a new one.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SaveProgressRequest {
    /// Owning player (required).
    pub player_id: Option<Uuid>,
    /// Variant the progress belongs to (required).
    pub game_type: Option<GameType>,
    /// Level the player is currently on.
    #[validate(range(min = 1))]
    pub current_level: Option<u32>,
    /// Accumulated score.
    pub score: Option<u32>,
    /// Full deck layout as opaque card identifiers.
    pub card_images: Option<Vec<String>>,
    /// Currently flipped subset of the deck.
    pub flipped_cards: Option<Vec<String>>,
    /// Already matched subset of the deck.
    pub matched_cards: Option<Vec<String>>,
}

impl SaveProgressRequest {
    /// Split the mutable fields out of the request.
    pub fn into_patch(self) -> ProgressPatch {
        ProgressPatch {
            current_level: self.current_level,
            score: self.score,
            card_images: self.card_images,
            flipped_cards: self.flipped_cards,
            matched_cards: self.matched_cards,
        }
    }
}

/// Progress record as exposed over the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressResponse {
    /// Identifier of the progress record.
    pub id: Uuid,
    /// Owning player.
    pub player_id: Uuid,
    /// Raw variant tag, e.g. `CARD_GAME`.
    pub game_type: GameType,
    /// Human readable variant label.
    pub game_type_display: String,
    /// Level the player is currently on.
    pub current_level: u32,
    /// Accumulated score.
    pub score: u32,
    /// Full deck layout.
    pub card_images: Vec<String>,
    /// Currently flipped subset.
    pub flipped_cards: Vec<String>,
    /// Already matched subset.
    pub matched_cards: Vec<String>,
    /// Last save timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<GameProgressEntity> for ProgressResponse {
    fn from(value: GameProgressEntity) -> Self {
        Self {
            id: value.id,
            player_id: value.player_id,
            game_type: value.game_type,
            game_type_display: value.game_type.display_name().to_owned(),
            current_level: value.current_level,
            score: value.score,
            card_images: value.card_images,
            flipped_cards: value.flipped_cards,
            matched_cards: value.matched_cards,
            updated_at: format_system_time(value.updated_at),
        }
    }
}
