/// OpenAPI documentation generation.
pub mod documentation;
/// Completed-game recording and listing.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Player registration guard and lookups.
pub mod player_service;
/// Per-player, per-game-type progress persistence.
pub mod progress_service;
/// Storage connectivity supervisor.
pub mod storage_supervisor;
