use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;
use time::UtcOffset;

use crate::{AppState, Error, timezone::get_local_offset};

/// The state needed by the expense handlers.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The most expenses a single listing returns.
    pub max_expenses: u32,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            max_expenses: state.max_expenses,
        }
    }
}

impl ExpenseState {
    /// The current UTC offset of the local timezone.
    pub(crate) fn local_offset(&self) -> Result<UtcOffset, Error> {
        get_local_offset(&self.local_timezone).ok_or_else(|| {
            tracing::error!("Could not get local timezone \"{}\"", self.local_timezone);
            Error::InvalidTimezone(self.local_timezone.clone())
        })
    }

    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)
    }
}
