//! A REST API for tracking personal expenses.
//!
//! Users register and log in to get a bearer token, then record, list, change
//! and delete their own expenses and get a summary of their spending by
//! category and by month. Every expense belongs to exactly one user and no
//! user can see or change another user's expenses.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod auth;
mod db;
pub mod endpoints;
mod error;
pub mod expense;
mod logging;
mod password;
mod routing;
mod timezone;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DEFAULT_MAX_EXPENSES};
pub use db::initialize as initialize_db;
pub use error::{Error, INTERNAL_ERROR_MESSAGE};
pub use logging::logging_middleware;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use timezone::{get_local_offset, today_in};
pub use user::{
    PublicUser, User, UserID, count_users, create_user, get_user_by_email, get_user_by_id,
    update_password,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
