//! Persistence seam shared by every storage backend.

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{GameEntity, GameProgressEntity, GameType, PlayerEntity, ProgressPatch};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for players, games, and progress.
///
/// Uniqueness guarantees live behind this trait: implementations must enforce
/// a unique player name and at most one progress record per
/// `(player, game_type)` pair, and `upsert_progress` must apply its patch as
/// one atomic write per key so concurrent saves serialize instead of
/// interleaving field by field.
pub trait MatchStore: Send + Sync {
    /// Insert a new player; fails with a duplicate-key error when the name is taken.
    fn create_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a player by id.
    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Fetch a player by exact name.
    fn find_player_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// List every registered player.
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Delete a player together with their games and progress records.
    /// Returns whether a player was actually removed.
    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    /// Append one completed-game record.
    fn record_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a completed game by id.
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// List completed games most-recent-first, optionally restricted to one
    /// player, never returning more than `limit` records.
    fn list_games(
        &self,
        player_id: Option<Uuid>,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Delete a completed game by id. Returns whether a record was removed.
    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    /// Fetch the unique progress record for `(player_id, game_type)`.
    fn find_progress(
        &self,
        player_id: Uuid,
        game_type: GameType,
    ) -> BoxFuture<'static, StorageResult<Option<GameProgressEntity>>>;
    /// Atomically update-or-create the progress record for
    /// `(player_id, game_type)` and return the post-write state.
    fn upsert_progress(
        &self,
        player_id: Uuid,
        game_type: GameType,
        patch: ProgressPatch,
    ) -> BoxFuture<'static, StorageResult<GameProgressEntity>>;

    /// Verify the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a lost backend connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
