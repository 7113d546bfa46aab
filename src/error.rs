use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    state::game::{GameError, MoveError},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Invalid input provided by the client.
    #[error("{0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// Resource already exists.
    #[error("{0}")]
    Conflict(String),
    /// Operation is not allowed in the current state of the resource.
    #[error("{0}")]
    Forbidden(String),
    /// Stored data violates an invariant the service relies on.
    #[error("inconsistent data: {0}")]
    Internal(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { message } => ServiceError::Conflict(message),
            other => ServiceError::Unavailable(other),
        }
    }
}

impl From<GameError> for ServiceError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::EmptyAnswer => {
                ServiceError::InvalidInput("You must enter an answer to create a new game!".into())
            }
            GameError::InvalidAnswer(_) => ServiceError::InvalidInput(
                "The answer may only contain letters!".into(),
            ),
            GameError::NoAttempts => {
                ServiceError::InvalidInput("Number of attempts must be greater than 0!".into())
            }
        }
    }
}

impl From<MoveError> for ServiceError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::InvalidGuess(_) => {
                ServiceError::InvalidInput("You must enter a single character!".into())
            }
            MoveError::GameOver => ServiceError::Forbidden("Game is over!".into()),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::InvalidInput(first_validation_message(&err))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(first_validation_message(&err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Message of the first failing field, fields taken in name order.
fn first_validation_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    let mut names: Vec<_> = fields.keys().collect();
    names.sort();

    names
        .into_iter()
        .find_map(|name| {
            let error = fields.get(name)?.first()?;
            Some(match &error.message {
                Some(message) => message.to_string(),
                None => format!("{name}: invalid value"),
            })
        })
        .unwrap_or_else(|| format!("validation failed: {errors}"))
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Operation forbidden for the targeted resource.
    #[error("{0}")]
    Forbidden(String),
    /// Requested resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("{0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Conflict(message) => AppError::Conflict(message),
            ServiceError::Forbidden(message) => AppError::Forbidden(message),
            ServiceError::Internal(message) => AppError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_conflict_maps_to_conflict() {
        let err: ServiceError = StorageError::conflict("duplicate user").into();
        assert!(matches!(err, ServiceError::Conflict(ref message) if message == "duplicate user"));

        let app: AppError = err.into();
        assert_eq!(app.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_errors_surface_the_field_message() {
        let mut errors = ValidationErrors::new();
        let mut attempts = validator::ValidationError::new("range");
        attempts.message = Some("Number of attempts must be greater than 0!".into());
        errors.add("attempts", attempts);
        let mut answer = validator::ValidationError::new("answer_empty");
        answer.message = Some("You must enter an answer to create a new game!".into());
        errors.add("answer", answer);

        let app: AppError = errors.into();
        assert!(
            matches!(app, AppError::BadRequest(ref message) if message == "You must enter an answer to create a new game!")
        );
    }

    #[test]
    fn validation_error_without_message_names_the_field() {
        let mut errors = ValidationErrors::new();
        errors.add("email", validator::ValidationError::new("email"));

        let err: ServiceError = errors.into();
        assert!(matches!(err, ServiceError::InvalidInput(ref message) if message == "email: invalid value"));
    }

    #[test]
    fn degraded_maps_to_service_unavailable() {
        let app: AppError = ServiceError::Degraded.into();
        assert_eq!(app.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
