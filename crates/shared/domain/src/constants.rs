//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Identifiers
// =============================================================================

/// Length of account, family and member identifiers
pub const ID_LENGTH: usize = 16;

// =============================================================================
// Field limits
// =============================================================================

/// Maximum stored length of an account's real name
pub const USER_NAME_MAX_CHARS: usize = 32;

/// Maximum stored length of an address (down to eup/myeon/dong)
pub const ADDRESS_MAX_CHARS: usize = 128;

/// Maximum stored length of a family nickname
pub const FAMILY_NAME_MAX_CHARS: usize = 32;

/// Maximum stored length of a member nickname
pub const NICKNAME_MAX_CHARS: usize = 32;

/// Earliest accepted birth year
pub const BIRTH_YEAR_MIN: i32 = 1900;

/// Latest accepted birth year
pub const BIRTH_YEAR_MAX: i32 = 2022;

// =============================================================================
// Authentication
// =============================================================================

/// Cookie carrying the login session key
pub const SESSION_COOKIE: &str = "session_id";

/// Default idle time in seconds before a sub user's session expires
pub const DEFAULT_SESSION_EXPIRE_SECONDS: i64 = 1800;

/// Placeholder shown wherever a password would otherwise be echoed
pub const PASSWORD_SENTINEL: &str = "<PASSWORD>";

// =============================================================================
// News
// =============================================================================

/// Categories collected and served by the news tool
pub const NEWS_CATEGORIES: [&str; 8] = [
    "business",
    "entertainment",
    "environment",
    "health",
    "politics",
    "science",
    "sports",
    "technology",
];

/// Clip an optional text field to at most `max` characters.
pub fn clip(value: Option<String>, max: usize) -> Option<String> {
    value.map(|v| {
        if v.chars().count() > max {
            v.chars().take(max).collect()
        } else {
            v
        }
    })
}
