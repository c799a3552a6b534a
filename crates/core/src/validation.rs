//! Input validation for user-submitted entities.

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a script title in characters.
pub const MAX_SCRIPT_TITLE_LENGTH: usize = 200;

/// Maximum length of a script description in characters.
pub const MAX_SCRIPT_DESCRIPTION_LENGTH: usize = 1_000;

/// Maximum length of a character name in characters.
pub const MAX_CHARACTER_NAME_LENGTH: usize = 100;

/// Maximum length of a play name in characters.
pub const MAX_PLAY_NAME_LENGTH: usize = 100;

/// Maximum length of a script genre label.
pub const MAX_GENRE_LENGTH: usize = 50;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Scripts
// ---------------------------------------------------------------------------

pub fn validate_script_title(title: &str) -> Result<(), CoreError> {
    require_text("Title", title, MAX_SCRIPT_TITLE_LENGTH)
}

pub fn validate_script_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Content must not be empty".into()));
    }
    Ok(())
}

pub fn validate_script_genre(genre: &str) -> Result<(), CoreError> {
    require_text("Genre", genre, MAX_GENRE_LENGTH)
}

/// Descriptions are optional; only the length is checked.
pub fn validate_script_description(description: &str) -> Result<(), CoreError> {
    let len = description.chars().count();
    if len > MAX_SCRIPT_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_SCRIPT_DESCRIPTION_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

pub fn validate_character_name(name: &str) -> Result<(), CoreError> {
    require_text("Character name", name, MAX_CHARACTER_NAME_LENGTH)
}

pub fn validate_play_name(play_name: &str) -> Result<(), CoreError> {
    require_text("Play name", play_name, MAX_PLAY_NAME_LENGTH)
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// Ids are allocated from 1; anything lower cannot reference an entity.
pub fn validate_reference(entity: &str, id: DbId) -> Result<(), CoreError> {
    if id < 1 {
        return Err(CoreError::Validation(format!(
            "{entity} id must be a positive integer (got {id})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn title_bounds() {
        assert!(validate_script_title("第十二夜·序幕").is_ok());
        assert_matches!(validate_script_title("  "), Err(CoreError::Validation(_)));
        assert!(validate_script_title(&"幕".repeat(200)).is_ok());
        assert!(validate_script_title(&"幕".repeat(201)).is_err());
    }

    #[test]
    fn description_may_be_empty() {
        assert!(validate_script_description("").is_ok());
        assert!(validate_script_description(&"a".repeat(1_001)).is_err());
    }

    #[test]
    fn content_and_genre_required() {
        assert!(validate_script_content("\n\n").is_err());
        assert!(validate_script_content("（幕启）").is_ok());
        assert!(validate_script_genre("").is_err());
        assert!(validate_script_genre("喜剧").is_ok());
    }

    #[test]
    fn character_names_checked_in_chars_not_bytes() {
        // 100 CJK characters are 300 bytes but still within the limit.
        assert!(validate_character_name(&"薇".repeat(100)).is_ok());
        assert!(validate_character_name(&"薇".repeat(101)).is_err());
        assert!(validate_play_name("").is_err());
    }

    #[test]
    fn references_must_be_positive() {
        assert!(validate_reference("Script", 1).is_ok());
        let err = validate_reference("Script", 0).unwrap_err();
        assert!(err.to_string().contains("Script id must be a positive integer"));
    }
}
