use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{DateTime, Document, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoGameDocument, MongoPlayerDocument, MongoProgressDocument, doc_id, uuid_as_binary},
};
use crate::dao::{
    models::{GameEntity, GameProgressEntity, GameType, PlayerEntity, ProgressPatch},
    storage::StorageResult,
    store::MatchStore,
};

const PLAYER_COLLECTION_NAME: &str = "players";
const GAME_COLLECTION_NAME: &str = "games";
const PROGRESS_COLLECTION_NAME: &str = "game_progress";

/// MongoDB-backed implementation of the [`MatchStore`] seam.
#[derive(Clone)]
pub struct MongoMatchStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoMatchStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// The unique indexes are the authoritative backstop for the player-name
    /// and `(player_id, game_type)` invariants; the application-level checks
    /// only exist to produce friendlier errors.
    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let players = database.collection::<Document>(PLAYER_COLLECTION_NAME);
        let name_index = mongodb::IndexModel::builder()
            .keys(doc! {"name": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("player_name_unique".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        players
            .create_index(name_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION_NAME,
                index: "name",
                source,
            })?;

        let progress = database.collection::<Document>(PROGRESS_COLLECTION_NAME);
        let progress_index = mongodb::IndexModel::builder()
            .keys(doc! {"player_id": 1, "game_type": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("progress_player_game_unique".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        progress
            .create_index(progress_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PROGRESS_COLLECTION_NAME,
                index: "player_id,game_type",
                source,
            })?;

        let games = database.collection::<Document>(GAME_COLLECTION_NAME);
        let played_at_index = mongodb::IndexModel::builder()
            .keys(doc! {"played_at": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("game_played_at_idx".to_owned()))
                    .build(),
            )
            .build();
        games
            .create_index(played_at_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: GAME_COLLECTION_NAME,
                index: "played_at",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn player_collection(&self) -> Collection<MongoPlayerDocument> {
        self.database()
            .await
            .collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME)
    }

    async fn game_collection(&self) -> Collection<MongoGameDocument> {
        self.database()
            .await
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
    }

    async fn progress_collection(&self) -> Collection<MongoProgressDocument> {
        self.database()
            .await
            .collection::<MongoProgressDocument>(PROGRESS_COLLECTION_NAME)
    }

    async fn create_player(&self, player: PlayerEntity) -> MongoResult<()> {
        let id = player.id;
        let document: MongoPlayerDocument = player.into();
        let collection = self.player_collection().await;
        collection.insert_one(&document).await.map_err(|source| {
            if is_duplicate_key(&source) {
                MongoDaoError::DuplicateKey {
                    key: "players.name",
                }
            } else {
                MongoDaoError::SavePlayer { id, source }
            }
        })?;
        Ok(())
    }

    async fn find_player(&self, id: Uuid) -> MongoResult<Option<PlayerEntity>> {
        let collection = self.player_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadPlayer { source })?;
        Ok(document.map(Into::into))
    }

    async fn find_player_by_name(&self, name: String) -> MongoResult<Option<PlayerEntity>> {
        let collection = self.player_collection().await;
        let document = collection
            .find_one(doc! {"name": name})
            .await
            .map_err(|source| MongoDaoError::LoadPlayer { source })?;
        Ok(document.map(Into::into))
    }

    async fn list_players(&self) -> MongoResult<Vec<PlayerEntity>> {
        let collection = self.player_collection().await;
        let documents: Vec<MongoPlayerDocument> = collection
            .find(doc! {})
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListPlayers { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListPlayers { source })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_player(&self, id: Uuid) -> MongoResult<bool> {
        // Owned records go first so a crash in between cannot orphan them
        // behind a missing player.
        let games = self.game_collection().await;
        games
            .delete_many(doc! {"player_id": uuid_as_binary(id)})
            .await
            .map_err(|source| MongoDaoError::DeletePlayer { id, source })?;

        let progress = self.progress_collection().await;
        progress
            .delete_many(doc! {"player_id": uuid_as_binary(id)})
            .await
            .map_err(|source| MongoDaoError::DeletePlayer { id, source })?;

        let players = self.player_collection().await;
        let result = players
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeletePlayer { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn record_game(&self, game: GameEntity) -> MongoResult<()> {
        let id = game.id;
        let document: MongoGameDocument = game.into();
        let collection = self.game_collection().await;
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveGame { id, source })?;
        Ok(())
    }

    async fn find_game(&self, id: Uuid) -> MongoResult<Option<GameEntity>> {
        let collection = self.game_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadGame { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn list_games(
        &self,
        player_id: Option<Uuid>,
        limit: usize,
    ) -> MongoResult<Vec<GameEntity>> {
        let filter = match player_id {
            Some(id) => doc! {"player_id": uuid_as_binary(id)},
            None => doc! {},
        };

        let collection = self.game_collection().await;
        let documents: Vec<MongoGameDocument> = collection
            .find(filter)
            .sort(doc! {"played_at": -1})
            .limit(limit as i64)
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_game(&self, id: Uuid) -> MongoResult<bool> {
        let collection = self.game_collection().await;
        let result = collection
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteGame { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn find_progress(
        &self,
        player_id: Uuid,
        game_type: GameType,
    ) -> MongoResult<Option<GameProgressEntity>> {
        let collection = self.progress_collection().await;
        let document = collection
            .find_one(progress_key(player_id, game_type))
            .await
            .map_err(|source| MongoDaoError::LoadProgress { player_id, source })?;
        Ok(document.map(Into::into))
    }

    /// One `findAndModify` per save: `$set` carries exactly the supplied
    /// fields, `$setOnInsert` fills the documented defaults on creation, and
    /// the unique `(player_id, game_type)` index guarantees a single record
    /// per key. When two saves race to insert the same key, the loser gets a
    /// duplicate-key error and one retry lands it on the update path.
    async fn upsert_progress(
        &self,
        player_id: Uuid,
        game_type: GameType,
        patch: ProgressPatch,
    ) -> MongoResult<GameProgressEntity> {
        let collection = self.progress_collection().await;
        let update = build_progress_update(&patch);

        let mut attempts = 0;
        loop {
            let result = collection
                .find_one_and_update(progress_key(player_id, game_type), update.clone())
                .upsert(true)
                .return_document(ReturnDocument::After)
                .await;

            match result {
                Ok(Some(document)) => return Ok(document.into()),
                Ok(None) => return Err(MongoDaoError::UpsertReturnedNothing { player_id }),
                Err(source) if is_duplicate_key(&source) && attempts == 0 => {
                    attempts += 1;
                }
                Err(source) => {
                    return Err(MongoDaoError::UpsertProgress { player_id, source });
                }
            }
        }
    }
}

fn progress_key(player_id: Uuid, game_type: GameType) -> Document {
    doc! {
        "player_id": uuid_as_binary(player_id),
        "game_type": game_type.as_str(),
    }
}

fn build_progress_update(patch: &ProgressPatch) -> Document {
    let mut set = doc! { "updated_at": DateTime::now() };
    let mut on_insert = doc! { "_id": uuid_as_binary(Uuid::new_v4()) };

    match patch.current_level {
        Some(level) => {
            set.insert("current_level", i64::from(level));
        }
        None => {
            on_insert.insert("current_level", 1i64);
        }
    }
    match patch.score {
        Some(score) => {
            set.insert("score", i64::from(score));
        }
        None => {
            on_insert.insert("score", 0i64);
        }
    }
    for (field, cards) in [
        ("card_images", &patch.card_images),
        ("flipped_cards", &patch.flipped_cards),
        ("matched_cards", &patch.matched_cards),
    ] {
        match cards {
            Some(cards) => {
                set.insert(field, cards.clone());
            }
            None => {
                on_insert.insert(field, Vec::<String>::new());
            }
        }
    }

    doc! { "$set": set, "$setOnInsert": on_insert }
}

impl MatchStore for MongoMatchStore {
    fn create_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.create_player(player).await.map_err(Into::into) })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player(id).await.map_err(Into::into) })
    }

    fn find_player_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player_by_name(name).await.map_err(Into::into) })
    }

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_players().await.map_err(Into::into) })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_player(id).await.map_err(Into::into) })
    }

    fn record_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.record_game(game).await.map_err(Into::into) })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await.map_err(Into::into) })
    }

    fn list_games(
        &self,
        player_id: Option<Uuid>,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games(player_id, limit).await.map_err(Into::into) })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_game(id).await.map_err(Into::into) })
    }

    fn find_progress(
        &self,
        player_id: Uuid,
        game_type: GameType,
    ) -> BoxFuture<'static, StorageResult<Option<GameProgressEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_progress(player_id, game_type)
                .await
                .map_err(Into::into)
        })
    }

    fn upsert_progress(
        &self,
        player_id: Uuid,
        game_type: GameType,
        patch: ProgressPatch,
    ) -> BoxFuture<'static, StorageResult<GameProgressEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .upsert_progress(player_id, game_type, patch)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_document_splits_supplied_and_defaulted_fields() {
        let update = build_progress_update(&ProgressPatch {
            current_level: Some(5),
            card_images: Some(vec!["cat".into(), "dog".into()]),
            ..ProgressPatch::default()
        });

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_i64("current_level").unwrap(), 5);
        assert!(set.get_array("card_images").is_ok());
        assert!(set.get("score").is_none());

        let on_insert = update.get_document("$setOnInsert").unwrap();
        assert_eq!(on_insert.get_i64("score").unwrap(), 0);
        assert!(on_insert.get("current_level").is_none());
        assert!(on_insert.get("card_images").is_none());
        assert!(on_insert.get_array("flipped_cards").unwrap().is_empty());
        assert!(on_insert.get_array("matched_cards").unwrap().is_empty());
    }
}
