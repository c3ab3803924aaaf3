//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted player name.
pub const MAX_PLAYER_NAME_LEN: usize = 100;

/// Validates that a player name is non-blank, within length bounds, and free
/// of control characters.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Alice")    // Ok
/// validate_player_name("   ")      // Err - blank
/// validate_player_name("a\nb")     // Err - control character
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("Player name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > MAX_PLAYER_NAME_LEN {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be at most {MAX_PLAYER_NAME_LEN} characters").into(),
        );
        return Err(err);
    }

    if name.chars().any(char::is_control) {
        let mut err = ValidationError::new("player_name_format");
        err.message = Some("Player name must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}
