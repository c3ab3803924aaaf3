use std::{collections::HashMap, time::SystemTime};

use uuid::Uuid;

use crate::{
    dao::models::GameEntity,
    dto::game::{DEFAULT_GAME_NAME, GameResponse, RecordGameRequest},
    error::ServiceError,
    services::player_service::PLAYER_NOT_FOUND_MESSAGE,
    state::SharedState,
};

/// Append one completed-game record for an existing player.
///
/// Pure insert: game records are immutable once created.
pub async fn record_game(
    state: &SharedState,
    request: RecordGameRequest,
) -> Result<GameResponse, ServiceError> {
    let store = state.require_store().await?;
    let Some(player) = store.find_player(request.player_id).await? else {
        return Err(ServiceError::NotFound(PLAYER_NOT_FOUND_MESSAGE.into()));
    };

    let game_name = request
        .game_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GAME_NAME.to_owned());

    let game = GameEntity {
        id: Uuid::new_v4(),
        player_id: player.id,
        game_type: request.game_type,
        game_name,
        score: request.score,
        played_at: SystemTime::now(),
    };
    store.record_game(game.clone()).await?;

    Ok(GameResponse::from_entity(game, player.name))
}

/// List completed games most-recent-first, optionally filtered by player.
pub async fn list_games(
    state: &SharedState,
    player_id: Option<Uuid>,
) -> Result<Vec<GameResponse>, ServiceError> {
    let store = state.require_store().await?;
    let games = store
        .list_games(player_id, state.config().games_page_size)
        .await?;

    let names: HashMap<Uuid, String> = store
        .list_players()
        .await?
        .into_iter()
        .map(|player| (player.id, player.name))
        .collect();

    Ok(games
        .into_iter()
        .map(|game| {
            let player_name = names.get(&game.player_id).cloned().unwrap_or_default();
            GameResponse::from_entity(game, player_name)
        })
        .collect())
}

/// Fetch a single completed game by id.
pub async fn get_game(state: &SharedState, id: Uuid) -> Result<GameResponse, ServiceError> {
    let store = state.require_store().await?;
    let Some(game) = store.find_game(id).await? else {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };
    let player_name = store
        .find_player(game.player_id)
        .await?
        .map(|player| player.name)
        .unwrap_or_default();
    Ok(GameResponse::from_entity(game, player_name))
}

/// Delete a completed game record.
pub async fn delete_game(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if !store.delete_game(id).await? {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::memory::MemoryMatchStore,
        dao::models::GameType,
        dto::player::CreatePlayerRequest,
        services::player_service,
        state::AppState,
    };

    async fn state_with_player(name: &str) -> (SharedState, Uuid) {
        let state = AppState::new(AppConfig::default());
        state.install_store(Arc::new(MemoryMatchStore::new())).await;
        let player = player_service::create_player(
            &state,
            CreatePlayerRequest { name: name.into() },
        )
        .await
        .unwrap();
        (state, player.id)
    }

    fn request(player_id: Uuid, score: i32) -> RecordGameRequest {
        RecordGameRequest {
            player_id,
            game_type: GameType::SequenceGame,
            game_name: None,
            score,
        }
    }

    #[tokio::test]
    async fn recording_requires_an_existing_player() {
        let (state, _player) = state_with_player("Alice").await;
        let err = record_game(&state, request(Uuid::new_v4(), 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn recorded_game_carries_defaults_and_player_name() {
        let (state, player_id) = state_with_player("Alice").await;
        let game = record_game(&state, request(player_id, 42)).await.unwrap();

        assert_eq!(game.game_name, DEFAULT_GAME_NAME);
        assert_eq!(game.player_name, "Alice");
        assert_eq!(game.game_type_display, "Sequence Memory");
        assert_eq!(game.score, 42);
    }

    #[tokio::test]
    async fn listing_is_most_recent_first_and_filterable() {
        let (state, alice) = state_with_player("Alice").await;
        let bob = player_service::create_player(
            &state,
            CreatePlayerRequest { name: "Bob".into() },
        )
        .await
        .unwrap()
        .id;

        for score in 1..=3 {
            record_game(&state, request(alice, score)).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        record_game(&state, request(bob, 99)).await.unwrap();

        let all = list_games(&state, None).await.unwrap();
        assert_eq!(all.len(), 4);
        // Most recent insert comes back first.
        assert_eq!(all.first().unwrap().score, 99);

        let alice_only = list_games(&state, Some(alice)).await.unwrap();
        assert_eq!(alice_only.len(), 3);
        assert!(alice_only.iter().all(|game| game.player_id == alice));
    }

    #[tokio::test]
    async fn deleting_a_game_removes_it_from_listings() {
        let (state, player_id) = state_with_player("Alice").await;
        let game = record_game(&state, request(player_id, 1)).await.unwrap();

        delete_game(&state, game.id).await.unwrap();
        assert!(list_games(&state, None).await.unwrap().is_empty());
        let err = get_game(&state, game.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
