//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount for an expense was missing, zero, negative or not a finite number.
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// The category string does not name one of the fixed expense categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// The date string could not be parsed as a calendar date or an RFC 3339 date-time.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// The request body could not be parsed as the expected JSON object.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The email address given during registration or log-in is malformed.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// A user with the same email address has already registered.
    #[error("User already exists")]
    DuplicateEmail,

    /// The request did not include a bearer token.
    #[error("Not authorized, no token")]
    MissingToken,

    /// The bearer token is malformed, has an invalid signature, has expired, or
    /// refers to a user that no longer exists.
    #[error("Not authorized, token failed")]
    InvalidToken,

    /// The email and password combination did not match a registered user.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No expense matches the ID for the authenticated user.
    ///
    /// This is also returned when the expense exists but belongs to another
    /// user, so that callers cannot probe for other users' records.
    #[error("Expense not found")]
    ExpenseNotFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The signing library could not create a token.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("user.email") => Error::DuplicateEmail,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code that the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidAmount
            | Error::InvalidCategory(_)
            | Error::InvalidDate(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidEmail(_)
            | Error::TooWeak(_)
            | Error::DuplicateEmail => StatusCode::BAD_REQUEST,
            Error::MissingToken | Error::InvalidToken | Error::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Error::ExpenseNotFound | Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezone(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The message sent to clients for errors that are only meant for the server logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong, check the server logs";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that end up here are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            INTERNAL_ERROR_MESSAGE.to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    use super::{Error, INTERNAL_ERROR_MESSAGE};

    async fn response_json(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("could not read response body");

        (status, serde_json::from_slice(&body).expect("body is not JSON"))
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let (status, body) = response_json(Error::InvalidAmount).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Amount must be greater than zero");
    }

    #[tokio::test]
    async fn missing_expense_is_not_found() {
        let (status, body) = response_json(Error::ExpenseNotFound).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Expense not found");
    }

    #[tokio::test]
    async fn auth_errors_are_unauthorized() {
        for error in [
            Error::MissingToken,
            Error::InvalidToken,
            Error::InvalidCredentials,
        ] {
            assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn unexpected_errors_hide_details() {
        let (status, body) = response_json(Error::HashingError("salt missing".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
