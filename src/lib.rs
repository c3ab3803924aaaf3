//! Library crate for memory-match-back, exposing modules for binaries and integration tests.

/// Runtime configuration loading.
pub mod config;
/// Storage backends and entity models.
pub mod dao;
/// Request and response payloads.
pub mod dto;
/// Service and transport error types.
pub mod error;
/// HTTP route trees.
pub mod routes;
/// Business logic services.
pub mod services;
/// Shared application state.
pub mod state;
