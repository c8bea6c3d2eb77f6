//! The endpoint that returns the authenticated user.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserID,
    auth::AuthState,
    user::{PublicUser, get_user_by_id},
};

/// The response body for the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    /// Always `true`.
    pub success: bool,
    /// The public view of the user.
    pub user: PublicUser,
}

/// Handler that returns the public view of the authenticated user.
pub async fn get_current_user(
    State(state): State<AuthState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<UserResponse>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)?;

    Ok(Json(UserResponse {
        success: true,
        user: (&user).into(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::{Router, extract::FromRef, middleware, routing::get};
    use axum_test::TestServer;

    use crate::{
        auth::{AuthState, UserResponse, auth_guard, get_current_user},
        test_utils::{create_test_user, get_test_app_state, get_test_token},
    };

    #[tokio::test]
    async fn returns_authenticated_user() {
        let app_state = get_test_app_state();
        let user_id = {
            let connection = app_state.db_connection.lock().unwrap();
            create_test_user("alice@example.com", &connection)
        };
        let state = AuthState::from_ref(&app_state);
        let app = Router::new()
            .route("/me", get(get_current_user))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server
            .get("/me")
            .authorization_bearer(get_test_token(user_id, &app_state))
            .await;

        response.assert_status_ok();
        let body = response.json::<UserResponse>();
        assert!(body.success);
        assert_eq!(body.user.id, user_id);
        assert_eq!(body.user.email, "alice@example.com");
    }
}
