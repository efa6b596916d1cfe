//! Helpers to validate Pokemon data.

use std::borrow::Cow;

use validator::ValidationError;

/// The valid Pokemon stat names.
///
/// Can be used to validate the `name` field of a stat struct.
pub const STAT_NAMES: [&str; 6] =
    ["hp", "attack", "defense", "special-attack", "special-defense", "speed"];

/// Validates a Pokemon stat name.
///
/// A stat name is only considered valid if it appears in [`STAT_NAMES`]. The stat names
/// are case-sensitive.
pub fn validate_stat_name(stat_name: &str) -> Result<(), ValidationError> {
    if STAT_NAMES.contains(&stat_name) {
        Ok(())
    } else {
        let error_message = format!(
            "stat name must match one of {} or {}",
            STAT_NAMES[..STAT_NAMES.len() - 1].join(", "),
            STAT_NAMES.last().cloned().unwrap(),
        );

        let mut validation_error = ValidationError::new("invalid_stat_name");
        validation_error.message = Some(Cow::from(error_message));

        Err(validation_error)
    }
}
