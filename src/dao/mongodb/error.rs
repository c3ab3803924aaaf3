use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

/// Result alias for MongoDB backend operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures raised by the MongoDB storage backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save player `{id}`")]
    SavePlayer {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load player")]
    LoadPlayer {
        #[source]
        source: MongoError,
    },
    #[error("failed to list players")]
    ListPlayers {
        #[source]
        source: MongoError,
    },
    #[error("failed to delete player `{id}`")]
    DeletePlayer {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to save game `{id}`")]
    SaveGame {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load game `{id}`")]
    LoadGame {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list games")]
    ListGames {
        #[source]
        source: MongoError,
    },
    #[error("failed to delete game `{id}`")]
    DeleteGame {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load progress for player `{player_id}`")]
    LoadProgress {
        player_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to upsert progress for player `{player_id}`")]
    UpsertProgress {
        player_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("upsert for player `{player_id}` returned no document")]
    UpsertReturnedNothing { player_id: Uuid },
    #[error("duplicate value for unique key `{key}`")]
    DuplicateKey { key: &'static str },
}
