use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::models::GameType,
    dto::progress::{ProgressQuery, ProgressResponse, SaveProgressRequest},
    error::ServiceError,
    services::player_service::PLAYER_NOT_FOUND_MESSAGE,
    state::SharedState,
};

/// Message returned when no progress record exists for the requested key.
pub const PROGRESS_NOT_FOUND_MESSAGE: &str = "Progress not found";
const MISSING_KEYS_MESSAGE: &str = "player_id and game_type are required";

fn require_keys(
    player_id: Option<Uuid>,
    game_type: Option<GameType>,
) -> Result<(Uuid, GameType), ServiceError> {
    match (player_id, game_type) {
        (Some(player_id), Some(game_type)) => Ok((player_id, game_type)),
        _ => Err(ServiceError::InvalidInput(MISSING_KEYS_MESSAGE.into())),
    }
}

/// Load the unique progress record for `(player_id, game_type)`.
///
/// Missing keys are a caller error, not a not-found; an unknown player and a
/// missing record both surface as 404s with distinct messages.
pub async fn get_progress(
    state: &SharedState,
    query: ProgressQuery,
) -> Result<ProgressResponse, ServiceError> {
    let (player_id, game_type) = require_keys(query.player_id, query.game_type)?;
    let store = state.require_store().await?;

    if store.find_player(player_id).await?.is_none() {
        return Err(ServiceError::NotFound(PLAYER_NOT_FOUND_MESSAGE.into()));
    }

    match store.find_progress(player_id, game_type).await? {
        Some(progress) => Ok(progress.into()),
        None => Err(ServiceError::NotFound(PROGRESS_NOT_FOUND_MESSAGE.into())),
    }
}

/// Persist the client's current board state so the session can be resumed.
///
/// The write is a single atomic upsert per `(player_id, game_type)` key,
/// delegated to the store: omitted fields stay unchanged on an existing
/// record and take their documented defaults on a brand-new one.
pub async fn save_progress(
    state: &SharedState,
    request: SaveProgressRequest,
) -> Result<ProgressResponse, ServiceError> {
    let (player_id, game_type) = require_keys(request.player_id, request.game_type)?;
    check_limits(state.config(), &request)?;

    let store = state.require_store().await?;
    if store.find_player(player_id).await?.is_none() {
        return Err(ServiceError::NotFound(PLAYER_NOT_FOUND_MESSAGE.into()));
    }

    let progress = store
        .upsert_progress(player_id, game_type, request.into_patch())
        .await?;
    Ok(progress.into())
}

fn check_limits(config: &AppConfig, request: &SaveProgressRequest) -> Result<(), ServiceError> {
    if let Some(level) = request.current_level {
        if level > config.max_level {
            return Err(ServiceError::InvalidInput(format!(
                "current_level must be at most {}",
                config.max_level
            )));
        }
    }

    for (field, cards) in [
        ("card_images", &request.card_images),
        ("flipped_cards", &request.flipped_cards),
        ("matched_cards", &request.matched_cards),
    ] {
        if let Some(cards) = cards {
            if cards.len() > config.max_cards {
                return Err(ServiceError::InvalidInput(format!(
                    "{field} must contain at most {} entries",
                    config.max_cards
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dao::memory::MemoryMatchStore,
        dto::player::CreatePlayerRequest,
        services::player_service,
        state::AppState,
    };

    async fn state_with_player() -> (SharedState, Uuid) {
        let state = AppState::new(AppConfig::default());
        state.install_store(Arc::new(MemoryMatchStore::new())).await;
        let player = player_service::create_player(
            &state,
            CreatePlayerRequest {
                name: "Alice".into(),
            },
        )
        .await
        .unwrap();
        (state, player.id)
    }

    fn save_request(player_id: Uuid) -> SaveProgressRequest {
        SaveProgressRequest {
            player_id: Some(player_id),
            game_type: Some(GameType::CardGame),
            current_level: None,
            score: None,
            card_images: None,
            flipped_cards: None,
            matched_cards: None,
        }
    }

    fn query(player_id: Uuid) -> ProgressQuery {
        ProgressQuery {
            player_id: Some(player_id),
            game_type: Some(GameType::CardGame),
        }
    }

    #[tokio::test]
    async fn missing_keys_are_a_validation_error() {
        let (state, player_id) = state_with_player().await;

        let mut request = save_request(player_id);
        request.game_type = None;
        let err = save_progress(&state, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = get_progress(
            &state,
            ProgressQuery {
                player_id: None,
                game_type: Some(GameType::CardGame),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_player_is_a_client_error() {
        let (state, _player) = state_with_player().await;
        let err = save_progress(&state, save_request(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ServiceError::NotFound(ref message) if message == PLAYER_NOT_FOUND_MESSAGE)
        );
    }

    #[tokio::test]
    async fn get_before_any_save_is_not_found() {
        let (state, player_id) = state_with_player().await;
        let err = get_progress(&state, query(player_id)).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::NotFound(ref message) if message == PROGRESS_NOT_FOUND_MESSAGE)
        );
    }

    #[tokio::test]
    async fn first_save_defaults_every_omitted_field() {
        let (state, player_id) = state_with_player().await;

        let mut request = save_request(player_id);
        request.current_level = Some(4);
        let saved = save_progress(&state, request).await.unwrap();

        assert_eq!(saved.current_level, 4);
        assert_eq!(saved.score, 0);
        assert!(saved.card_images.is_empty());
        assert!(saved.flipped_cards.is_empty());
        assert!(saved.matched_cards.is_empty());
    }

    #[tokio::test]
    async fn second_save_wins_without_creating_a_second_record() {
        let (state, player_id) = state_with_player().await;

        let mut first = save_request(player_id);
        first.score = Some(10);
        let first_saved = save_progress(&state, first).await.unwrap();

        let mut second = save_request(player_id);
        second.score = Some(25);
        let second_saved = save_progress(&state, second).await.unwrap();

        assert_eq!(second_saved.id, first_saved.id);
        let loaded = get_progress(&state, query(player_id)).await.unwrap();
        assert_eq!(loaded.score, 25);
    }

    #[tokio::test]
    async fn partial_save_leaves_other_fields_untouched() {
        let (state, player_id) = state_with_player().await;

        let mut first = save_request(player_id);
        first.current_level = Some(3);
        first.card_images = Some(vec!["cat".into(), "dog".into(), "fox".into()]);
        save_progress(&state, first).await.unwrap();

        let mut second = save_request(player_id);
        second.flipped_cards = Some(vec!["cat".into()]);
        let saved = save_progress(&state, second).await.unwrap();

        assert_eq!(saved.current_level, 3);
        assert_eq!(saved.card_images.len(), 3);
        assert_eq!(saved.flipped_cards, vec!["cat".to_owned()]);
    }

    #[tokio::test]
    async fn progress_is_independent_per_game_type() {
        let (state, player_id) = state_with_player().await;

        let mut card = save_request(player_id);
        card.score = Some(5);
        save_progress(&state, card).await.unwrap();

        let mut chimp = save_request(player_id);
        chimp.game_type = Some(GameType::ChimpTest);
        chimp.score = Some(50);
        save_progress(&state, chimp).await.unwrap();

        let card_loaded = get_progress(&state, query(player_id)).await.unwrap();
        assert_eq!(card_loaded.score, 5);
    }

    #[tokio::test]
    async fn configured_limits_bound_saves() {
        let state = AppState::new(AppConfig {
            max_level: 10,
            max_cards: 2,
            ..AppConfig::default()
        });
        state.install_store(Arc::new(MemoryMatchStore::new())).await;
        let player = player_service::create_player(
            &state,
            CreatePlayerRequest {
                name: "Alice".into(),
            },
        )
        .await
        .unwrap();

        let mut request = save_request(player.id);
        request.current_level = Some(11);
        let err = save_progress(&state, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let mut request = save_request(player.id);
        request.card_images = Some(vec!["a".into(), "b".into(), "c".into()]);
        let err = save_progress(&state, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
