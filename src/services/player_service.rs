use uuid::Uuid;

use crate::{
    dao::{models::PlayerEntity, storage::StorageError},
    dto::player::{CheckNameResponse, CreatePlayerRequest, PlayerResponse},
    error::ServiceError,
    state::SharedState,
};

/// Message returned when a registration hits an existing name.
pub const DUPLICATE_NAME_MESSAGE: &str = "This name is already taken";
pub(crate) const PLAYER_NOT_FOUND_MESSAGE: &str = "Player not found";

/// Probe whether a player name is already taken. No side effects.
pub async fn check_name(state: &SharedState, name: &str) -> Result<CheckNameResponse, ServiceError> {
    let store = state.require_store().await?;
    let exists = store.find_player_by_name(name.to_owned()).await?.is_some();
    Ok(CheckNameResponse { exists })
}

/// Register a new player.
///
/// The lookup before the insert only exists to produce the friendly duplicate
/// message; the store's unique index is the authoritative check, so a race
/// that slips past the lookup still surfaces as the same error.
pub async fn create_player(
    state: &SharedState,
    request: CreatePlayerRequest,
) -> Result<PlayerResponse, ServiceError> {
    let store = state.require_store().await?;
    let name = request.name.trim().to_owned();

    if store.find_player_by_name(name.clone()).await?.is_some() {
        return Err(ServiceError::Duplicate(DUPLICATE_NAME_MESSAGE.into()));
    }

    let player = PlayerEntity::new(name);
    match store.create_player(player.clone()).await {
        Ok(()) => Ok(player.into()),
        Err(StorageError::DuplicateKey { .. }) => {
            Err(ServiceError::Duplicate(DUPLICATE_NAME_MESSAGE.into()))
        }
        Err(other) => Err(other.into()),
    }
}

/// List every registered player.
pub async fn list_players(state: &SharedState) -> Result<Vec<PlayerResponse>, ServiceError> {
    let store = state.require_store().await?;
    let players = store.list_players().await?;
    Ok(players.into_iter().map(Into::into).collect())
}

/// Fetch a single player by id.
pub async fn get_player(state: &SharedState, id: Uuid) -> Result<PlayerResponse, ServiceError> {
    let store = state.require_store().await?;
    let Some(player) = store.find_player(id).await? else {
        return Err(ServiceError::NotFound(PLAYER_NOT_FOUND_MESSAGE.into()));
    };
    Ok(player.into())
}

/// Delete a player together with their games and progress records.
pub async fn delete_player(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if !store.delete_player(id).await? {
        return Err(ServiceError::NotFound(PLAYER_NOT_FOUND_MESSAGE.into()));
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
        dto::{game::RecordGameRequest, progress::SaveProgressRequest},
        services::{game_service, progress_service},
        state::AppState,
    };

    async fn state_with_store() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state.install_store(Arc::new(MemoryMatchStore::new())).await;
        state
    }

    fn create_request(name: &str) -> CreatePlayerRequest {
        CreatePlayerRequest { name: name.into() }
    }

    #[tokio::test]
    async fn check_name_flips_once_the_player_exists() {
        let state = state_with_store().await;

        assert!(!check_name(&state, "Alice").await.unwrap().exists);
        create_player(&state, create_request("Alice")).await.unwrap();
        assert!(check_name(&state, "Alice").await.unwrap().exists);
    }

    #[tokio::test]
    async fn second_registration_with_same_name_is_rejected() {
        let state = state_with_store().await;

        create_player(&state, create_request("Alice")).await.unwrap();
        let err = create_player(&state, create_request("Alice"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ServiceError::Duplicate(ref message) if message == DUPLICATE_NAME_MESSAGE)
        );
    }

    #[tokio::test]
    async fn names_are_trimmed_before_registration() {
        let state = state_with_store().await;

        let created = create_player(&state, create_request("  Alice  "))
            .await
            .unwrap();
        assert_eq!(created.name, "Alice");
        assert!(check_name(&state, "Alice").await.unwrap().exists);
    }

    #[tokio::test]
    async fn deleting_a_player_cascades_to_games_and_progress() {
        let state = state_with_store().await;
        let player = create_player(&state, create_request("Bob")).await.unwrap();

        game_service::record_game(
            &state,
            RecordGameRequest {
                player_id: player.id,
                game_type: GameType::CardGame,
                game_name: None,
                score: 7,
            },
        )
        .await
        .unwrap();
        progress_service::save_progress(
            &state,
            SaveProgressRequest {
                player_id: Some(player.id),
                game_type: Some(GameType::CardGame),
                current_level: Some(2),
                score: None,
                card_images: None,
                flipped_cards: None,
                matched_cards: None,
            },
        )
        .await
        .unwrap();

        delete_player(&state, player.id).await.unwrap();

        assert!(
            game_service::list_games(&state, Some(player.id))
                .await
                .unwrap()
                .is_empty()
        );
        let err = progress_service::get_progress(
            &state,
            crate::dto::progress::ProgressQuery {
                player_id: Some(player.id),
                game_type: Some(GameType::CardGame),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn requests_fail_fast_in_degraded_mode() {
        let state = AppState::new(AppConfig::default());
        let err = check_name(&state, "Alice").await.unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }
}
