use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{GameEntity, GameProgressEntity, GameType, PlayerEntity};

/// Player document as stored in the `players` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    created_at: DateTime,
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoPlayerDocument> for PlayerEntity {
    fn from(value: MongoPlayerDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            created_at: value.created_at.to_system_time(),
        }
    }
}

/// Completed-game document as stored in the `games` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    player_id: Uuid,
    game_type: GameType,
    game_name: String,
    score: i32,
    played_at: DateTime,
}

impl From<GameEntity> for MongoGameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id,
            player_id: value.player_id,
            game_type: value.game_type,
            game_name: value.game_name,
            score: value.score,
            played_at: DateTime::from_system_time(value.played_at),
        }
    }
}

impl From<MongoGameDocument> for GameEntity {
    fn from(value: MongoGameDocument) -> Self {
        Self {
            id: value.id,
            player_id: value.player_id,
            game_type: value.game_type,
            game_name: value.game_name,
            score: value.score,
            played_at: value.played_at.to_system_time(),
        }
    }
}

/// Progress document as stored in the `game_progress` collection.
///
/// Integer fields are widened to `i64` because that is what the upsert
/// pipeline writes; the entity conversion narrows them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoProgressDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    player_id: Uuid,
    game_type: GameType,
    current_level: i64,
    score: i64,
    card_images: Vec<String>,
    flipped_cards: Vec<String>,
    matched_cards: Vec<String>,
    updated_at: DateTime,
}

impl From<MongoProgressDocument> for GameProgressEntity {
    fn from(value: MongoProgressDocument) -> Self {
        Self {
            id: value.id,
            player_id: value.player_id,
            game_type: value.game_type,
            current_level: value.current_level.max(1) as u32,
            score: value.score.max(0) as u32,
            card_images: value.card_images,
            flipped_cards: value.flipped_cards,
            matched_cards: value.matched_cards,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
