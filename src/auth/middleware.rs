//! Authentication middleware that checks bearer tokens before protected
//! handlers run.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState, Error, UserID,
    auth::{JwtKeys, decode_token},
    user::get_user_by_id,
};

/// The state needed for the auth middleware and the account handlers.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The keys for signing and verifying bearer tokens.
    pub jwt_keys: JwtKeys,
    /// How long newly issued bearer tokens are valid for.
    pub token_duration: Duration,
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            jwt_keys: state.jwt_keys.clone(),
            token_duration: state.token_duration,
            password_hash_cost: state.password_hash_cost,
        }
    }
}

/// Middleware function that checks for a valid bearer token.
///
/// The user ID is placed into the request extensions and the request executed
/// normally if the token is valid and the user still exists, otherwise a 401
/// JSON response is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, bearer) {
        Ok(user_id) => {
            request.extensions_mut().insert(user_id);
            next.run(request).await
        }
        Err(error) => error.into_response(),
    }
}

fn authenticate(
    state: &AuthState,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
) -> Result<UserID, Error> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| {
        if !rejection.is_missing() {
            tracing::warn!("malformed authorization header: {rejection}");
        }

        Error::MissingToken
    })?;

    let claims = decode_token(bearer.token(), state.jwt_keys.decoding_key())?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    match get_user_by_id(claims.user_id, &connection) {
        Ok(user) => Ok(user.id),
        Err(Error::NotFound) => {
            tracing::warn!(
                "rejected token for user {} that no longer exists",
                claims.user_id
            );
            Err(Error::InvalidToken)
        }
        Err(error) => Err(error),
    }
}
