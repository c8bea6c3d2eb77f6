#![allow(missing_docs)]

use rusqlite::Connection;

use crate::{
    AppState, PasswordHash, UserID, ValidatedPassword,
    app_state::DEFAULT_MAX_EXPENSES,
    auth::encode_token,
    db::initialize,
    user::create_user,
};

/// A password that passes the strength check.
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

// The minimum bcrypt cost, keeps the tests fast.
const TEST_PASSWORD_HASH_COST: u32 = 4;

pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user whose password hash is never checked.
#[track_caller]
pub(crate) fn create_test_user(email: &str, connection: &Connection) -> UserID {
    create_user(
        "",
        email,
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
    .id
}

/// Insert a user that can log in with `password`.
#[track_caller]
pub(crate) fn insert_user_with_password(
    email: &str,
    password: &str,
    connection: &Connection,
) -> UserID {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(password),
        TEST_PASSWORD_HASH_COST,
    )
    .expect("Could not hash password");

    create_user("", email, password_hash, connection)
        .expect("Could not create test user")
        .id
}

pub(crate) fn get_test_app_state() -> AppState {
    let mut state = AppState::new(
        Connection::open_in_memory().expect("Could not create in-memory SQLite database"),
        "42",
        "Etc/UTC",
        DEFAULT_MAX_EXPENSES,
    )
    .expect("Could not create app state");
    state.password_hash_cost = TEST_PASSWORD_HASH_COST;

    state
}

#[track_caller]
pub(crate) fn get_test_token(user_id: UserID, state: &AppState) -> String {
    encode_token(user_id, state.token_duration, state.jwt_keys.encoding_key())
        .expect("Could not create test token")
}
