//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::AppError;

/// JSON extractor that automatically validates the payload.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::no_data(e.body_text()).at(["body"]))?;

        value
            .validate()
            .map_err(|e| validation_error("body", &e))?;

        Ok(ValidatedJson(value))
    }
}

/// First field error, by field name, as a 422 located at `{origin}.{field}`.
pub fn validation_error(origin: &str, errors: &ValidationErrors) -> AppError {
    let first = errors
        .field_errors()
        .into_iter()
        .min_by_key(|(field, _)| *field)
        .map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|error| error.message.as_ref())
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| format!("Invalid value for {}", field));
            (field.to_string(), message)
        });

    match first {
        Some((field, message)) => AppError::no_data(message).at([origin.to_string(), field]),
        None => AppError::no_data("Validation failed").at([origin]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_validation_error_points_at_field() {
        let mut errors = ValidationErrors::new();
        let mut error = ValidationError::new("length");
        error.message = Some("Message is too short".into());
        errors.add("user_message", error);

        let err = validation_error("body", &errors);
        let detail = err.detail();
        assert_eq!(detail.message, "Message is too short");
        assert_eq!(
            detail.loc,
            Some(vec!["body".to_string(), "user_message".to_string()])
        );
    }

    #[test]
    fn test_validation_error_picks_lowest_field_name() {
        let mut errors = ValidationErrors::new();
        for field in ["user_message", "session_id", "user_id"] {
            let mut error = ValidationError::new("length");
            error.message = Some(format!("{} is invalid", field).into());
            errors.add(field, error);
        }

        let err = validation_error("body", &errors);
        let detail = err.detail();
        assert_eq!(detail.message, "session_id is invalid");
        assert_eq!(
            detail.loc,
            Some(vec!["body".to_string(), "session_id".to_string()])
        );
    }
}
