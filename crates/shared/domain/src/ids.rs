//! Typed random identifiers.
//!
//! Accounts, families and members share one 16-character format: the
//! uppercase initial of the kind followed by random ASCII alphanumerics.

use rand::{distributions::Alphanumeric, Rng};

use crate::constants::ID_LENGTH;

/// The kind of record an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    User,
    Family,
    Member,
}

impl IdKind {
    /// Leading character of identifiers of this kind.
    pub fn prefix(&self) -> char {
        match self {
            IdKind::User => 'U',
            IdKind::Family => 'F',
            IdKind::Member => 'M',
        }
    }
}

/// Generate a fresh identifier. Uniqueness is checked by the caller.
pub fn generate_id(kind: IdKind) -> String {
    let mut id = String::with_capacity(ID_LENGTH);
    id.push(kind.prefix());
    id.extend(
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH - 1)
            .map(char::from),
    );
    id
}

/// Whether `value` has the shape of an identifier (16 ASCII alphanumerics).
pub fn is_valid_id(value: &str) -> bool {
    value.len() == ID_LENGTH && value.chars().all(|c| c.is_ascii_alphanumeric())
}
