//! The log-in endpoint and the response shared by the account endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{AuthState, encode_token},
    user::{PublicUser, User, get_user_by_email},
};

/// The response to a successful registration or log-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Always `true`.
    pub success: bool,
    /// The bearer token for authenticating later requests.
    pub token: String,
    /// The public view of the user the token was issued to.
    pub user: PublicUser,
}

impl AuthResponse {
    pub(crate) fn new(token: String, user: &User) -> Self {
        Self {
            success: true,
            token,
            user: user.into(),
        }
    }
}

/// The credentials sent by a user logging in.
#[derive(Debug, Clone, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the email does not belong to a
/// registered user or the password is wrong. Both cases give the same error so
/// that callers cannot find out which emails are registered.
pub async fn log_in(
    State(state): State<AuthState>,
    body: Result<Json<LogInData>, JsonRejection>,
) -> Result<Json<AuthResponse>, Error> {
    let Json(credentials) = body?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(&credentials.email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    if !user.password_hash.verify(&credentials.password)? {
        tracing::debug!("wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id, state.token_duration, state.jwt_keys.encoding_key())?;

    Ok(Json(AuthResponse::new(token, &user)))
}

#[cfg(test)]
mod log_in_tests {
    use axum::{Router, extract::FromRef, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        auth::{AuthResponse, AuthState, decode_token, log_in},
        test_utils::{TEST_PASSWORD, get_test_app_state, insert_user_with_password},
    };

    fn get_test_server() -> (TestServer, AuthState) {
        let state = AuthState::from_ref(&get_test_app_state());
        {
            let connection = state.db_connection.lock().unwrap();
            insert_user_with_password("alice@example.com", TEST_PASSWORD, &connection);
        }

        let app = Router::new()
            .route("/log_in", post(log_in))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let (server, state) = get_test_server();

        let response = server
            .post("/log_in")
            .json(&json!({ "email": "alice@example.com", "password": TEST_PASSWORD }))
            .await;

        response.assert_status_ok();
        let body = response.json::<AuthResponse>();
        assert!(body.success);
        assert_eq!(body.user.email, "alice@example.com");
        let claims = decode_token(&body.token, state.jwt_keys.decoding_key()).unwrap();
        assert_eq!(claims.user_id, body.user.id);
    }

    #[tokio::test]
    async fn log_in_ignores_email_case() {
        let (server, _) = get_test_server();

        let response = server
            .post("/log_in")
            .json(&json!({ "email": "Alice@Example.com", "password": TEST_PASSWORD }))
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn log_in_ignores_surrounding_whitespace() {
        let (server, _) = get_test_server();

        let response = server
            .post("/log_in")
            .json(&json!({ "email": "  alice@example.com ", "password": TEST_PASSWORD }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<AuthResponse>().user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let (server, _) = get_test_server();

        let response = server
            .post("/log_in")
            .json(&json!({ "email": "alice@example.com", "password": "wrongpassword" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid email or password");
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let (server, _) = get_test_server();

        let response = server
            .post("/log_in")
            .json(&json!({ "email": "bob@example.com", "password": TEST_PASSWORD }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["message"], "Invalid email or password");
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_field() {
        let (server, _) = get_test_server();

        let response = server
            .post("/log_in")
            .json(&json!({ "email": "alice@example.com" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
