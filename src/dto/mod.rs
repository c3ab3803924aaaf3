use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Completed-game request/response payloads.
pub mod game;
/// Health check payloads.
pub mod health;
/// Player registration payloads.
pub mod player;
/// Progress upsert payloads.
pub mod progress;
/// Validation helpers for DTOs.
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
