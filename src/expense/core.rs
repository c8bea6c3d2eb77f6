//! Defines the core data models and database queries for expenses.
//!
//! Every query that touches an existing expense filters on both the expense ID
//! and the owner, so one user can never read or change another user's records.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, UserID, expense::Category, expense::validation::validate_amount};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for expense IDs.
pub type ExpenseId = i64;

/// Parse an expense ID taken from a URL path.
///
/// # Errors
/// Returns [Error::ExpenseNotFound] if `raw_id` is not an integer, since no
/// expense can have such an ID.
pub fn parse_expense_id(raw_id: &str) -> Result<ExpenseId, Error> {
    raw_id.parse().map_err(|_| {
        tracing::debug!("invalid expense ID {raw_id:?}");
        Error::ExpenseNotFound
    })
}

pub(crate) mod date_format {
    //! Serializes a [time::Date] as an ISO 8601 calendar date, e.g. "2025-01-15".
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Money spent by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    #[serde(rename = "_id")]
    pub id: ExpenseId,
    /// How much was spent, always greater than zero.
    pub amount: f64,
    /// The day the money was spent.
    #[serde(with = "date_format")]
    pub date: Date,
    /// A free text description, may be empty.
    pub note: String,
    /// What the money was spent on.
    pub category: Category,
    /// The user that created the expense.
    pub owner: UserID,
    /// When the expense was recorded. Never changes after creation.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated expense that has not been saved yet.
///
/// The amount is checked on construction, so a `NewExpense` always holds a
/// positive amount.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    amount: f64,
    date: Date,
    note: String,
    category: Category,
}

impl NewExpense {
    /// Create a new expense with an empty note and the default category.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is not greater than zero.
    pub fn new(amount: f64, date: Date) -> Result<Self, Error> {
        Ok(Self {
            amount: validate_amount(amount)?,
            date,
            note: String::new(),
            category: Category::default(),
        })
    }

    /// Set the note for the expense.
    pub fn note(mut self, note: &str) -> Self {
        self.note = note.to_owned();
        self
    }

    /// Set the category for the expense.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

/// The fields to change in an existing expense. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    amount: Option<f64>,
    date: Option<Date>,
    note: Option<String>,
    category: Option<Category>,
}

impl ExpenseUpdate {
    /// Change the amount.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is not greater than zero.
    pub fn amount(mut self, amount: f64) -> Result<Self, Error> {
        self.amount = Some(validate_amount(amount)?);
        Ok(self)
    }

    /// Change the date.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Change the note.
    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_owned());
        self
    }

    /// Change the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const EXPENSE_COLUMNS: &str = "id, amount, date, note, category, owner_id, created_at";

/// Create the expense table in the database.
///
/// The checks on `amount` and `category` mirror the validation in this module
/// so that rows written by other tools still hold the invariants.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount > 0),
                date TEXT NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'Other'
                    CHECK (category IN ('Food', 'Travel', 'Bills', 'Entertainment', 'Other')),
                owner_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(owner_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Every query filters by owner and most sort or filter by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_owner_date ON expense(owner_id, date);",
        (),
    )?;

    Ok(())
}

/// Save a new expense for `owner`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// for example if `owner` does not refer to a registered user.
pub fn create_expense(
    owner: UserID,
    expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = connection
        .prepare(&format!(
            "INSERT INTO expense (amount, date, note, category, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                expense.amount,
                expense.date,
                expense.note,
                expense.category,
                owner.as_i64(),
                OffsetDateTime::now_utc(),
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve the expense with `id` that belongs to `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::ExpenseNotFound] if there is no expense with `id` owned by `owner`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, owner: UserID, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id AND owner_id = :owner_id"
        ))?
        .query_row(
            &[(":id", &id), (":owner_id", &owner.as_i64())],
            map_expense_row,
        )
        .map_err(map_missing_expense)
}

/// Apply `update` to the expense with `id` that belongs to `owner` and return
/// the updated expense.
///
/// The update is a single statement, so concurrent updates to the same
/// expense are applied one after another and the last one wins.
///
/// # Errors
/// This function will return a:
/// - [Error::ExpenseNotFound] if there is no expense with `id` owned by `owner`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    owner: UserID,
    update: ExpenseUpdate,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "UPDATE expense
             SET \
                amount = COALESCE(?1, amount), \
                date = COALESCE(?2, date), \
                note = COALESCE(?3, note), \
                category = COALESCE(?4, category) \
             WHERE id = ?5 AND owner_id = ?6
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                update.amount,
                update.date,
                update.note,
                update.category,
                id,
                owner.as_i64(),
            ),
            map_expense_row,
        )
        .map_err(map_missing_expense)
}

/// Delete the expense with `id` that belongs to `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::ExpenseNotFound] if there is no expense with `id` owned by `owner`,
///   including when another request deleted it first,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: ExpenseId, owner: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = :id AND owner_id = :owner_id",
        &[(":id", &id), (":owner_id", &owner.as_i64())],
    )?;

    match rows_affected {
        0 => Err(Error::ExpenseNotFound),
        _ => Ok(()),
    }
}

/// Map a database row to an [Expense].
///
/// The row must contain the columns in the order of `EXPENSE_COLUMNS`.
pub(crate) fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
        note: row.get(3)?,
        category: row.get(4)?,
        owner: UserID::new(row.get(5)?),
        created_at: row.get(6)?,
    })
}

fn map_missing_expense(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::QueryReturnedNoRows => Error::ExpenseNotFound,
        error => error.into(),
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod serialization_tests {
    use serde_json::json;
    use time::{UtcOffset, macros::date, macros::datetime};

    use crate::{
        UserID,
        expense::{Category, Expense},
    };

    #[test]
    fn serializes_with_wire_field_names() {
        let expense = Expense {
            id: 7,
            amount: 25.5,
            date: date!(2025 - 01 - 05),
            note: "lunch".to_owned(),
            category: Category::Food,
            owner: UserID::new(1),
            created_at: datetime!(2025-01-05 12:30:00).assume_offset(UtcOffset::UTC),
        };

        let got = serde_json::to_value(&expense).unwrap();

        assert_eq!(
            got,
            json!({
                "_id": 7,
                "amount": 25.5,
                "date": "2025-01-05",
                "note": "lunch",
                "category": "Food",
                "owner": 1,
                "createdAt": "2025-01-05T12:30:00Z",
            })
        );
    }
}
