//! Input validation for ninja names and inbound chat text.

use std::collections::HashSet;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 20;

/// Ninja name validation errors with helpful messages
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NinjaNameError {
    #[error("name is too short (minimum 2 characters)")]
    TooShort,

    #[error("name is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("name cannot start or end with whitespace")]
    InvalidWhitespace,

    #[error("name contains control characters: {chars}")]
    ControlCharacters { chars: String },

    #[error("name may not start with a mention or the command prefix")]
    LeadingSymbol,

    #[error("'{0}' is a reserved name")]
    Reserved(String),
}

/// Names that would read as bot commands or system accounts.
fn reserved_names() -> HashSet<&'static str> {
    [
        "admin", "administrator", "root", "system", "bot", "moderator", "mod",
        "everyone", "here", "nobody", "null", "undefined",
        // command words
        "help", "start", "create", "profile", "clans", "reroll", "missions", "mission",
        "accept", "complete", "abandon", "daily", "shop", "buy", "heal", "jutsu", "xp",
        "cancel",
    ]
    .iter()
    .copied()
    .collect()
}

/// Validate a character name typed during the interactive creation flow.
/// Returns the name as it will be stored.
pub fn validate_ninja_name(name: &str) -> Result<String, NinjaNameError> {
    let trimmed = name.trim();
    let count = trimmed.chars().count();

    if count < NAME_MIN_CHARS {
        return Err(NinjaNameError::TooShort);
    }
    if count > NAME_MAX_CHARS {
        return Err(NinjaNameError::TooLong {
            max: NAME_MAX_CHARS,
        });
    }
    if trimmed != name {
        return Err(NinjaNameError::InvalidWhitespace);
    }

    if trimmed.chars().any(|c| c.is_control()) {
        let chars = trimmed
            .chars()
            .filter(|c| c.is_control())
            .map(|c| format!("\\u{{{:04x}}}", c as u32))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(NinjaNameError::ControlCharacters { chars });
    }

    let leading_prefix = crate::config::ALLOWED_PREFIXES
        .iter()
        .any(|p| trimmed.starts_with(*p));
    if trimmed.starts_with('@') || leading_prefix {
        return Err(NinjaNameError::LeadingSymbol);
    }

    let lower = trimmed.to_lowercase();
    if reserved_names().contains(lower.as_str()) {
        return Err(NinjaNameError::Reserved(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Derive a ninja name from a platform display name for one-step creation.
///
/// Control characters and leading mention or prefix symbols are dropped, and the
/// rest is trimmed and cut to [`NAME_MAX_CHARS`]. Returns `None` when what is left
/// still fails [`validate_ninja_name`] (too short, reserved).
pub fn ninja_name_from_display(display: &str) -> Option<String> {
    let cleaned: String = display.chars().filter(|c| !c.is_control()).collect();
    let stripped = cleaned.trim().trim_start_matches(|c: char| {
        c == '@'
            || c.is_whitespace()
            || crate::config::ALLOWED_PREFIXES
                .iter()
                .any(|p| p.chars().eq(std::iter::once(c)))
    });
    let cut: String = stripped.chars().take(NAME_MAX_CHARS).collect();
    validate_ninja_name(cut.trim_end()).ok()
}

/// Strip control characters and cap the length in characters.
pub fn sanitize_chat_text(content: &str, max_chars: usize) -> String {
    content
        .chars()
        .filter(|c| !c.is_control())
        .take(max_chars)
        .collect()
}
