//! In-process storage backend.
//!
//! Fills the [`MatchStore`] seam without any external database: tests run
//! against it, and it is the fallback backend when the crate is built without
//! the `mongo-store` feature. Uniqueness is enforced through dedicated key
//! maps whose entry locks double as the per-key atomicity guarantee.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{GameEntity, GameProgressEntity, GameType, PlayerEntity, ProgressPatch};
use crate::dao::storage::{StorageError, StorageResult};
use crate::dao::store::MatchStore;

/// Storage backend keeping every record in process memory.
#[derive(Clone, Default)]
pub struct MemoryMatchStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    players: DashMap<Uuid, PlayerEntity>,
    // Unique name index, the in-process equivalent of the database constraint.
    names: DashMap<String, Uuid>,
    games: DashMap<Uuid, GameEntity>,
    progress: DashMap<(Uuid, GameType), GameProgressEntity>,
}

impl MemoryMatchStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn create_player_sync(&self, player: PlayerEntity) -> StorageResult<()> {
        match self.inner.names.entry(player.name.clone()) {
            Entry::Occupied(_) => Err(StorageError::DuplicateKey {
                key: "players.name",
            }),
            Entry::Vacant(slot) => {
                slot.insert(player.id);
                self.inner.players.insert(player.id, player);
                Ok(())
            }
        }
    }

    fn delete_player_sync(&self, id: Uuid) -> bool {
        let Some((_, player)) = self.inner.players.remove(&id) else {
            return false;
        };
        self.inner.names.remove(&player.name);
        self.inner.games.retain(|_, game| game.player_id != id);
        self.inner.progress.retain(|(owner, _), _| *owner != id);
        true
    }

    fn list_games_sync(&self, player_id: Option<Uuid>, limit: usize) -> Vec<GameEntity> {
        let mut games: Vec<GameEntity> = self
            .inner
            .games
            .iter()
            .filter(|entry| player_id.is_none_or(|id| entry.player_id == id))
            .map(|entry| entry.value().clone())
            .collect();
        games.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        games.truncate(limit);
        games
    }

    fn upsert_progress_sync(
        &self,
        player_id: Uuid,
        game_type: GameType,
        patch: ProgressPatch,
    ) -> GameProgressEntity {
        // The entry guard holds the shard lock for the key, so the whole
        // read-modify-write is atomic with respect to concurrent savers.
        let mut record = self
            .inner
            .progress
            .entry((player_id, game_type))
            .or_insert_with(|| GameProgressEntity::fresh(player_id, game_type));
        record.apply(&patch);
        record.clone()
    }
}

impl MatchStore for MemoryMatchStore {
    fn create_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.create_player_sync(player) })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.players.get(&id).map(|p| p.value().clone())) })
    }

    fn find_player_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let id = store.inner.names.get(&name).map(|entry| *entry.value());
            Ok(id.and_then(|id| store.inner.players.get(&id).map(|p| p.value().clone())))
        })
    }

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut players: Vec<PlayerEntity> = store
                .inner
                .players
                .iter()
                .map(|entry| entry.value().clone())
                .collect();
            players.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            Ok(players)
        })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.delete_player_sync(id)) })
    }

    fn record_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.games.insert(game.id, game);
            Ok(())
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.games.get(&id).map(|g| g.value().clone())) })
    }

    fn list_games(
        &self,
        player_id: Option<Uuid>,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list_games_sync(player_id, limit)) })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.games.remove(&id).is_some()) })
    }

    fn find_progress(
        &self,
        player_id: Uuid,
        game_type: GameType,
    ) -> BoxFuture<'static, StorageResult<Option<GameProgressEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .progress
                .get(&(player_id, game_type))
                .map(|p| p.value().clone()))
        })
    }

    fn upsert_progress(
        &self,
        player_id: Uuid,
        game_type: GameType,
        patch: ProgressPatch,
    ) -> BoxFuture<'static, StorageResult<GameProgressEntity>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.upsert_progress_sync(player_id, game_type, patch)) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(level: Option<u32>, score: Option<u32>) -> ProgressPatch {
        ProgressPatch {
            current_level: level,
            score,
            ..ProgressPatch::default()
        }
    }

    #[tokio::test]
    async fn duplicate_player_name_is_rejected() {
        let store = MemoryMatchStore::new();
        store
            .create_player(PlayerEntity::new("Alice".into()))
            .await
            .unwrap();

        let err = store
            .create_player(PlayerEntity::new("Alice".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { key } if key == "players.name"));
    }

    #[tokio::test]
    async fn upsert_creates_then_overwrites_single_record() {
        let store = MemoryMatchStore::new();
        let player = Uuid::new_v4();

        let first = store
            .upsert_progress(player, GameType::CardGame, patch(Some(3), None))
            .await
            .unwrap();
        assert_eq!(first.current_level, 3);
        assert_eq!(first.score, 0);

        let second = store
            .upsert_progress(player, GameType::CardGame, patch(None, Some(120)))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.current_level, 3);
        assert_eq!(second.score, 120);

        let loaded = store
            .find_progress(player, GameType::CardGame)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.score, 120);
        assert_eq!(store.inner.progress.len(), 1);
    }

    #[tokio::test]
    async fn progress_is_keyed_per_game_type() {
        let store = MemoryMatchStore::new();
        let player = Uuid::new_v4();

        store
            .upsert_progress(player, GameType::CardGame, patch(Some(2), None))
            .await
            .unwrap();
        store
            .upsert_progress(player, GameType::ChimpTest, patch(Some(7), None))
            .await
            .unwrap();

        let card = store
            .find_progress(player, GameType::CardGame)
            .await
            .unwrap()
            .unwrap();
        let chimp = store
            .find_progress(player, GameType::ChimpTest)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(card.current_level, 2);
        assert_eq!(chimp.current_level, 7);
    }

    #[tokio::test]
    async fn concurrent_saves_for_one_key_leave_one_record() {
        let store = MemoryMatchStore::new();
        let player = Uuid::new_v4();

        let mut handles = Vec::new();
        for score in 0..16u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .upsert_progress(player, GameType::CardGame, patch(None, Some(score)))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.inner.progress.len(), 1);
        let record = store
            .find_progress(player, GameType::CardGame)
            .await
            .unwrap()
            .unwrap();
        assert!(record.score < 16);
    }

    #[tokio::test]
    async fn deleting_a_player_cascades() {
        let store = MemoryMatchStore::new();
        let player = PlayerEntity::new("Bob".into());
        let player_id = player.id;
        store.create_player(player).await.unwrap();

        let game = GameEntity {
            id: Uuid::new_v4(),
            player_id,
            game_type: GameType::SequenceGame,
            game_name: "Memory Match".into(),
            score: 10,
            played_at: std::time::SystemTime::now(),
        };
        store.record_game(game).await.unwrap();
        store
            .upsert_progress(player_id, GameType::SequenceGame, patch(Some(4), None))
            .await
            .unwrap();

        assert!(store.delete_player(player_id).await.unwrap());
        assert!(
            store
                .find_progress(player_id, GameType::SequenceGame)
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.list_games(Some(player_id), 50).await.unwrap().is_empty());
        // Name becomes available again once the owner is gone.
        assert!(
            store
                .find_player_by_name("Bob".into())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn games_list_most_recent_first() {
        let store = MemoryMatchStore::new();
        let player = Uuid::new_v4();
        let base = std::time::SystemTime::now();

        for (score, offset) in [(1, 0u64), (2, 10), (3, 5)] {
            let game = GameEntity {
                id: Uuid::new_v4(),
                player_id: player,
                game_type: GameType::CardGame,
                game_name: "Memory Match".into(),
                score,
                played_at: base + std::time::Duration::from_secs(offset),
            };
            store.record_game(game).await.unwrap();
        }

        let games = store.list_games(None, 50).await.unwrap();
        let scores: Vec<i32> = games.iter().map(|g| g.score).collect();
        assert_eq!(scores, vec![2, 3, 1]);

        let limited = store.list_games(None, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }
}
