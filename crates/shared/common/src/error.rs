//! Unified error handling for the HTTP services.
//!
//! Every failure leaves a handler as an [`AppError`] and is rendered as
//!
//! ```json
//! {"detail": {"type": "not found", "message": "Account not found", "input": {...}, "loc": ["body", "id"]}}
//! ```
//!
//! `input` and `loc` are omitted when not set.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{constants::PASSWORD_SENTINEL, DomainError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Client-facing part of an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Detail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Vec<String>>,
}

impl Detail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            input: None,
            loc: None,
        }
    }
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("{}", .0.message)]
    NoData(Detail),

    #[error("{}", .0.message)]
    InvalidValue(Detail),

    // Authentication & Authorization
    #[error("{}", .0.message)]
    Unauthorized(Detail),

    #[error("{}", .0.message)]
    Forbidden(Detail),

    // Resource errors
    #[error("{}", .0.message)]
    NotFound(Detail),

    #[error("{}", .0.message)]
    Conflict(Detail),

    // External service errors
    #[error("{}", .0.message)]
    Timeout(Detail),

    #[error("{}", .0.message)]
    ServiceUnavailable(Detail),

    /// Failure with a message meant for the client
    #[error("{}", .0.message)]
    Server(Detail),

    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "cache")]
    #[error("Cache error")]
    Cache(#[from] redis::RedisError),

    #[error("Upstream error: {0}")]
    Upstream(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    detail: Detail,
}

impl AppError {
    /// Value of the `type` field
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NoData(_) => "no data",
            AppError::InvalidValue(_) => "invalid value",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "can not access",
            AppError::NotFound(_) => "not found",
            AppError::Conflict(_) => "already exists",
            AppError::Timeout(_) => "timeout",
            _ => "server error",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing detail. Internal causes are logged and replaced.
    pub fn detail(&self) -> Detail {
        match self {
            AppError::NoData(d)
            | AppError::InvalidValue(d)
            | AppError::Unauthorized(d)
            | AppError::Forbidden(d)
            | AppError::NotFound(d)
            | AppError::Conflict(d)
            | AppError::Timeout(d)
            | AppError::ServiceUnavailable(d)
            | AppError::Server(d) => d.clone(),

            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                Detail::new("A database error occurred")
            }
            #[cfg(feature = "cache")]
            AppError::Cache(e) => {
                tracing::error!("Cache error: {:?}", e);
                Detail::new("A cache error occurred")
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                Detail::new("A service communication error occurred")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                Detail::new("An internal error occurred")
            }
        }
    }

    fn detail_mut(&mut self) -> Option<&mut Detail> {
        match self {
            AppError::NoData(d)
            | AppError::InvalidValue(d)
            | AppError::Unauthorized(d)
            | AppError::Forbidden(d)
            | AppError::NotFound(d)
            | AppError::Conflict(d)
            | AppError::Timeout(d)
            | AppError::ServiceUnavailable(d)
            | AppError::Server(d) => Some(d),
            _ => None,
        }
    }

    /// Attach the offending request input.
    ///
    /// A top-level `password` field is always replaced by the sentinel.
    pub fn with_input(mut self, input: impl Serialize) -> Self {
        if let Some(detail) = self.detail_mut() {
            let mut value = serde_json::to_value(input).unwrap_or(Value::Null);
            mask_password(&mut value);
            detail.input = Some(value);
        }
        self
    }

    /// Attach the location of the offending field, e.g. `at(["body", "email"])`.
    pub fn at<I, S>(mut self, loc: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(detail) = self.detail_mut() {
            detail.loc = Some(loc.into_iter().map(Into::into).collect());
        }
        self
    }
}

fn mask_password(value: &mut Value) {
    if let Value::Object(map) = value {
        for key in ["password", "current_password", "new_password"] {
            if let Some(field) = map.get_mut(key) {
                if !field.is_null() {
                    *field = Value::String(PASSWORD_SENTINEL.to_string());
                }
            }
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            detail: ErrorBody {
                kind: self.code(),
                detail: self.detail(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidValue(msg) => AppError::invalid_value(msg),
            DomainError::Password(msg) => AppError::no_data(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    /// `None` becomes a 404 with the given message.
    fn ok_or_not_found(self, message: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(message))
    }
}

/// Convenience constructors
impl AppError {
    pub fn no_data(msg: impl Into<String>) -> Self {
        AppError::NoData(Detail::new(msg))
    }

    pub fn invalid_value(msg: impl Into<String>) -> Self {
        AppError::InvalidValue(Detail::new(msg))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(Detail::new(msg))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(Detail::new(msg))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(Detail::new(msg))
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(Detail::new(msg))
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        AppError::Timeout(Detail::new(msg))
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        AppError::ServiceUnavailable(Detail::new(msg))
    }

    pub fn server(msg: impl Into<String>) -> Self {
        AppError::Server(Detail::new(msg))
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        AppError::Upstream(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(err: AppError) -> Value {
        serde_json::to_value(ErrorResponse {
            detail: ErrorBody {
                kind: err.code(),
                detail: err.detail(),
            },
        })
        .unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::no_data("x").status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::invalid_value("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::timeout("x").status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            AppError::service_unavailable("x").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AppError::internal("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_envelope_shape() {
        let err = AppError::no_data("Password is required")
            .at(["body", "password"])
            .with_input(json!({"email": "a@b.c"}));

        assert_eq!(
            body(err),
            json!({
                "detail": {
                    "type": "no data",
                    "message": "Password is required",
                    "input": {"email": "a@b.c"},
                    "loc": ["body", "password"]
                }
            })
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let value = body(AppError::not_found("Account not found"));
        assert_eq!(
            value,
            json!({"detail": {"type": "not found", "message": "Account not found"}})
        );
    }

    #[test]
    fn test_password_is_masked_in_input() {
        let err = AppError::unauthorized("Invalid password")
            .with_input(json!({"user_id": "U1", "password": "secret"}));

        assert_eq!(body(err)["detail"]["input"]["password"], "<PASSWORD>");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let value = body(AppError::internal("connection refused at 10.0.0.3"));
        assert_eq!(value["detail"]["type"], "server error");
        assert_eq!(value["detail"]["message"], "An internal error occurred");
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: AppError = DomainError::invalid("bad role").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_ok_or_not_found() {
        let missing: Option<i32> = None;
        let err = missing.ok_or_not_found("Family not found").unwrap_err();
        assert_eq!(err.detail().message, "Family not found");
    }
}
