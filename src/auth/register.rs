//! The endpoint for registering a new user account.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error, PasswordHash, ValidatedPassword,
    auth::{AuthResponse, AuthState, encode_token},
    user::create_user,
};

/// The data sent by a user registering an account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterData {
    /// The display name, may be omitted.
    #[serde(default)]
    pub name: String,
    /// The email address the user will log in with.
    pub email: String,
    /// The password the user will log in with.
    pub password: String,
}

/// Handler for registering a new user.
///
/// On success the user is logged in straight away: the response holds a
/// bearer token along with the public view of the new user.
///
/// # Errors
///
/// This function will return an error if:
/// - the email address is malformed ([Error::InvalidEmail]),
/// - the password is too weak ([Error::TooWeak]),
/// - or the email address is already registered ([Error::DuplicateEmail]).
pub async fn register_user(
    State(state): State<AuthState>,
    body: Result<Json<RegisterData>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), Error> {
    let Json(data) = body?;

    let email = data.email.trim();
    if !EmailAddress::is_valid(email) {
        return Err(Error::InvalidEmail(email.to_owned()));
    }

    let password = ValidatedPassword::new(&data.password, &[email, data.name.as_str()])?;
    let password_hash = PasswordHash::new(password, state.password_hash_cost)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        create_user(&data.name, email, password_hash, &connection)?
    };

    tracing::info!("registered user {}", user.id);

    let token = encode_token(user.id, state.token_duration, state.jwt_keys.encoding_key())?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(token, &user))))
}
