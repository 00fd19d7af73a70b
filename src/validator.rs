use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;

/// Flattens `ValidationErrors` into a field-keyed map of messages, e.g.
/// `{"email": ["email is invalid"], "password": ["..."]}`.
fn validation_error_map(errors: &ValidationErrors) -> Map<String, Value> {
    let mut map = Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<Value> = field_errors
            .iter()
            .map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
            .map(Value::String)
            .collect();
        map.insert(field.to_string(), Value::Array(messages));
    }
    map
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return AppError::field_error(field, format!("{} is required", field));
                }

                if error_msg.contains("unknown variant") {
                    return AppError::bad_request("Invalid value for enumerated field");
                }

                if error_msg.contains("invalid type") {
                    return AppError::bad_request("Invalid field type in request");
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(
                        "Missing 'Content-Type: application/json' header",
                    );
                }

                AppError::bad_request("Invalid request body")
            })?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(validation_error_map(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, serde::Deserialize, Validate)]
    struct TestDto {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn test_validation_error_map_keys() {
        let dto = TestDto {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        let map = validation_error_map(&errors);

        assert!(map.contains_key("email"));
        assert!(map.contains_key("password"));

        let password_msgs = map.get("password").unwrap().as_array().unwrap();
        assert_eq!(password_msgs[0], "Password must be at least 8 characters");
    }

    #[test]
    fn test_validation_error_map_empty_on_valid() {
        let dto = TestDto {
            email: "a@b.com".to_string(),
            password: "long-enough".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
