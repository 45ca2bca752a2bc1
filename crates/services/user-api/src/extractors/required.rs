//! Required-field checks that keep the offending request in the error.

use serde::Serialize;

use common::{AppError, AppResult};

/// Unwrap a required body field or fail with 422 `"{label} is required"`.
pub fn require<T, I: Serialize>(
    value: Option<T>,
    field: &str,
    label: &str,
    input: &I,
) -> AppResult<T> {
    value.ok_or_else(|| missing("body", field, label, input))
}

/// Like [`require`], treating an empty string as missing.
pub fn require_text<I: Serialize>(
    value: Option<String>,
    field: &str,
    label: &str,
    input: &I,
) -> AppResult<String> {
    non_empty(value).ok_or_else(|| missing("body", field, label, input))
}

/// Required query parameter, empty counts as missing.
pub fn require_query<I: Serialize>(
    value: Option<String>,
    param: &str,
    label: &str,
    input: &I,
) -> AppResult<String> {
    non_empty(value).ok_or_else(|| missing("query", param, label, input))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

fn missing<I: Serialize>(origin: &str, field: &str, label: &str, input: &I) -> AppError {
    AppError::no_data(format!("{} is required", label))
        .at([origin, field])
        .with_input(input)
}
