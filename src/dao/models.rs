//! Entity definitions shared by the storage backends and the service layer.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Closed set of game variants tracked by the backend.
///
/// The wire representation matches the tags the clients already send
/// (`CARD_GAME`, `SEQUENCE_GAME`, ...), so the enum doubles as the persisted
/// value in every backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    /// Classic card pair matching.
    CardGame,
    /// Repeat an ever-growing sequence.
    SequenceGame,
    /// Ayumu-style number ordering test.
    ChimpTest,
    /// Remember highlighted tiles on a grid.
    VisualMemory,
    /// Click as soon as the screen changes.
    ReactionTime,
    /// Seen-before word recall.
    VerbalMemory,
    /// Recall an increasingly long number.
    NumberMemory,
}

impl GameType {
    /// Wire tag for this variant, identical to its serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::CardGame => "CARD_GAME",
            GameType::SequenceGame => "SEQUENCE_GAME",
            GameType::ChimpTest => "CHIMP_TEST",
            GameType::VisualMemory => "VISUAL_MEMORY",
            GameType::ReactionTime => "REACTION_TIME",
            GameType::VerbalMemory => "VERBAL_MEMORY",
            GameType::NumberMemory => "NUMBER_MEMORY",
        }
    }

    /// Human readable label exposed next to the raw tag in API payloads.
    pub fn display_name(&self) -> &'static str {
        match self {
            GameType::CardGame => "Card Matching",
            GameType::SequenceGame => "Sequence Memory",
            GameType::ChimpTest => "Chimp Test",
            GameType::VisualMemory => "Visual Memory",
            GameType::ReactionTime => "Reaction Time",
            GameType::VerbalMemory => "Verbal Memory",
            GameType::NumberMemory => "Number Memory",
        }
    }
}

/// Registered player owning games and progress records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name, unique across all players.
    pub name: String,
    /// Registration timestamp.
    pub created_at: SystemTime,
}

impl PlayerEntity {
    /// Build a new player with a fresh identifier.
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: SystemTime::now(),
        }
    }
}

/// Immutable record of one completed play session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game record.
    pub id: Uuid,
    /// Owning player.
    pub player_id: Uuid,
    /// Variant that was played.
    pub game_type: GameType,
    /// Free-form session label.
    pub game_name: String,
    /// Final score of the session.
    pub score: i32,
    /// Completion timestamp, used for most-recent-first listings.
    pub played_at: SystemTime,
}

/// Mutable in-flight session state, at most one per `(player, game_type)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameProgressEntity {
    /// Primary key of the progress record.
    pub id: Uuid,
    /// Owning player.
    pub player_id: Uuid,
    /// Variant this progress belongs to.
    pub game_type: GameType,
    /// Level the player is currently on (>= 1).
    pub current_level: u32,
    /// Accumulated score (>= 0).
    pub score: u32,
    /// Full deck layout as opaque card identifiers.
    pub card_images: Vec<String>,
    /// Currently flipped subset of the deck.
    pub flipped_cards: Vec<String>,
    /// Already matched subset of the deck.
    pub matched_cards: Vec<String>,
    /// Last save timestamp.
    pub updated_at: SystemTime,
}

impl GameProgressEntity {
    /// A brand-new progress record with the documented defaults:
    /// level 1, score 0, empty card sequences.
    pub fn fresh(player_id: Uuid, game_type: GameType) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            game_type,
            current_level: 1,
            score: 0,
            card_images: Vec::new(),
            flipped_cards: Vec::new(),
            matched_cards: Vec::new(),
            updated_at: SystemTime::now(),
        }
    }

    /// Overwrite exactly the fields supplied in `patch`, leaving the rest
    /// untouched, and stamp the modification time.
    pub fn apply(&mut self, patch: &ProgressPatch) {
        if let Some(level) = patch.current_level {
            self.current_level = level;
        }
        if let Some(score) = patch.score {
            self.score = score;
        }
        if let Some(cards) = &patch.card_images {
            self.card_images = cards.clone();
        }
        if let Some(cards) = &patch.flipped_cards {
            self.flipped_cards = cards.clone();
        }
        if let Some(cards) = &patch.matched_cards {
            self.matched_cards = cards.clone();
        }
        self.updated_at = SystemTime::now();
    }
}

/// Set of mutable progress fields supplied by one save call.
///
/// `None` means "leave unchanged on an existing record, default-fill on a new
/// one"; the store applies the whole patch as a single atomic write per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressPatch {
    /// New current level, if supplied.
    pub current_level: Option<u32>,
    /// New score, if supplied.
    pub score: Option<u32>,
    /// New deck layout, if supplied.
    pub card_images: Option<Vec<String>>,
    /// New flipped subset, if supplied.
    pub flipped_cards: Option<Vec<String>>,
    /// New matched subset, if supplied.
    pub matched_cards: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_type_wire_tags_match_serde() {
        for game_type in [
            GameType::CardGame,
            GameType::SequenceGame,
            GameType::ChimpTest,
            GameType::VisualMemory,
            GameType::ReactionTime,
            GameType::VerbalMemory,
            GameType::NumberMemory,
        ] {
            let json = serde_json::to_string(&game_type).unwrap();
            assert_eq!(json, format!("\"{}\"", game_type.as_str()));
            let parsed: GameType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, game_type);
        }
    }

    #[test]
    fn fresh_progress_uses_documented_defaults() {
        let player = Uuid::new_v4();
        let progress = GameProgressEntity::fresh(player, GameType::CardGame);
        assert_eq!(progress.current_level, 1);
        assert_eq!(progress.score, 0);
        assert!(progress.card_images.is_empty());
        assert!(progress.flipped_cards.is_empty());
        assert!(progress.matched_cards.is_empty());
    }

    #[test]
    fn apply_patch_only_touches_supplied_fields() {
        let mut progress = GameProgressEntity::fresh(Uuid::new_v4(), GameType::SequenceGame);
        progress.card_images = vec!["a".into(), "b".into()];

        progress.apply(&ProgressPatch {
            score: Some(40),
            ..ProgressPatch::default()
        });

        assert_eq!(progress.score, 40);
        assert_eq!(progress.current_level, 1);
        assert_eq!(progress.card_images, vec!["a".to_owned(), "b".to_owned()]);
    }
}
