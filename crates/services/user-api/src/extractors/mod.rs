//! Custom extractors.

mod required;

use once_cell::sync::Lazy;
use regex::Regex;

pub use common::extract::{ValidatedJson, ValidatedQuery};
pub use required::{require, require_query, require_text};

/// Account, family and member identifiers: 16 ASCII letters or digits.
pub static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{16}$").expect("valid id pattern"));
