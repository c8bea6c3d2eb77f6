//! Validation of expense data sent by clients.
//!
//! Requests are checked in full before anything is written to the database,
//! so a rejected request never leaves a partial change behind.

use serde::Deserialize;
use time::{Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::{
    Error,
    expense::{Category, ExpenseUpdate, NewExpense, core::date_format::DATE_FORMAT},
};

/// The body of a request to create an expense.
///
/// Fields that clients may not set, such as the owner, are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateExpenseRequest {
    /// Required, must be greater than zero.
    pub amount: Option<f64>,
    /// Defaults to today.
    pub date: Option<String>,
    /// Defaults to the empty string.
    pub note: Option<String>,
    /// Defaults to [Category::Other].
    pub category: Option<String>,
}

impl CreateExpenseRequest {
    /// Check the request and fill in defaults.
    ///
    /// `local_offset` is used to find today's date and to convert date-times
    /// to calendar dates.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::InvalidAmount] if the amount is missing or not greater than zero,
    /// - [Error::InvalidDate] if the date cannot be parsed,
    /// - or [Error::InvalidCategory] if the category is not one of the fixed categories.
    pub fn validate(self, local_offset: UtcOffset) -> Result<NewExpense, Error> {
        let amount = validate_amount(self.amount.ok_or(Error::InvalidAmount)?)?;

        let date = match non_empty(self.date) {
            Some(raw_date) => parse_date(&raw_date, local_offset)?,
            None => OffsetDateTime::now_utc().to_offset(local_offset).date(),
        };

        let category = match non_empty(self.category) {
            Some(raw_category) => raw_category.parse()?,
            None => Category::default(),
        };

        Ok(NewExpense::new(amount, date)?
            .note(self.note.as_deref().unwrap_or_default())
            .category(category))
    }
}

/// The body of a request to change an expense.
///
/// Only the fields that are present are changed.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    /// Must be greater than zero if present.
    pub amount: Option<f64>,
    /// Ignored if empty.
    pub date: Option<String>,
    /// The new note, may be empty.
    pub note: Option<String>,
    /// Must be one of the fixed categories if present.
    pub category: Option<String>,
}

impl UpdateExpenseRequest {
    /// Check the request and convert it into an [ExpenseUpdate].
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::InvalidAmount] if the amount is present and not greater than zero,
    /// - [Error::InvalidDate] if the date is present and cannot be parsed,
    /// - or [Error::InvalidCategory] if the category is present and not one of the fixed categories.
    pub fn validate(self, local_offset: UtcOffset) -> Result<ExpenseUpdate, Error> {
        let mut update = ExpenseUpdate::default();

        if let Some(amount) = self.amount {
            update = update.amount(amount)?;
        }

        if let Some(raw_date) = non_empty(self.date) {
            update = update.date(parse_date(&raw_date, local_offset)?);
        }

        if let Some(note) = self.note {
            update = update.note(&note);
        }

        if let Some(raw_category) = self.category {
            update = update.category(raw_category.parse()?);
        }

        Ok(update)
    }
}

/// Check that `amount` is a finite number greater than zero.
///
/// # Errors
/// Returns [Error::InvalidAmount] otherwise.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount)
    }
}

/// Parse a calendar date such as "2025-01-15", or an RFC 3339 date-time such
/// as "2025-01-15T09:30:00Z".
///
/// Date-times are converted to `local_offset` before taking the date, so an
/// expense made late in the evening stays on the right day.
///
/// # Errors
/// Returns [Error::InvalidDate] if `raw_date` is in neither format.
pub fn parse_date(raw_date: &str, local_offset: UtcOffset) -> Result<Date, Error> {
    let raw_date = raw_date.trim();

    Date::parse(raw_date, DATE_FORMAT)
        .or_else(|_| {
            OffsetDateTime::parse(raw_date, &Rfc3339)
                .map(|date_time| date_time.to_offset(local_offset).date())
        })
        .map_err(|_| Error::InvalidDate(raw_date.to_owned()))
}

/// Treat empty and whitespace-only strings the same as missing values.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod create_tests {
    use time::{OffsetDateTime, UtcOffset, macros::date};

    use crate::{
        Error,
        expense::{Category, NewExpense},
    };

    use super::CreateExpenseRequest;

    fn request(amount: Option<f64>) -> CreateExpenseRequest {
        CreateExpenseRequest {
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_positive_amounts() {
        for amount in [0.01, 1.0, 25.5, 1_000_000.0] {
            assert!(request(Some(amount)).validate(UtcOffset::UTC).is_ok());
        }
    }

    #[test]
    fn rejects_missing_and_non_positive_amounts() {
        for amount in [None, Some(0.0), Some(-0.0), Some(-5.0), Some(f64::INFINITY)] {
            assert_eq!(
                request(amount).validate(UtcOffset::UTC),
                Err(Error::InvalidAmount),
                "amount {amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn fills_in_defaults() {
        let want_date = OffsetDateTime::now_utc().date();

        let got = request(Some(10.0)).validate(UtcOffset::UTC).unwrap();

        assert_eq!(got, NewExpense::new(10.0, want_date).unwrap());
    }

    #[test]
    fn empty_strings_use_defaults() {
        let got = CreateExpenseRequest {
            amount: Some(10.0),
            date: Some("".to_owned()),
            note: None,
            category: Some(" ".to_owned()),
        }
        .validate(UtcOffset::UTC)
        .unwrap();

        let want = NewExpense::new(10.0, OffsetDateTime::now_utc().date()).unwrap();
        assert_eq!(got, want);
    }

    #[test]
    fn keeps_given_fields() {
        let got = CreateExpenseRequest {
            amount: Some(25.5),
            date: Some("2025-01-15".to_owned()),
            note: Some("lunch".to_owned()),
            category: Some("Food".to_owned()),
        }
        .validate(UtcOffset::UTC)
        .unwrap();

        let want = NewExpense::new(25.5, date!(2025 - 01 - 15))
            .unwrap()
            .note("lunch")
            .category(Category::Food);
        assert_eq!(got, want);
    }

    #[test]
    fn rejects_unknown_category() {
        let result = CreateExpenseRequest {
            amount: Some(25.5),
            category: Some("Groceries".to_owned()),
            ..Default::default()
        }
        .validate(UtcOffset::UTC);

        assert_eq!(result, Err(Error::InvalidCategory("Groceries".to_owned())));
    }

    #[test]
    fn rejects_invalid_date() {
        let result = CreateExpenseRequest {
            amount: Some(25.5),
            date: Some("yesterday".to_owned()),
            ..Default::default()
        }
        .validate(UtcOffset::UTC);

        assert_eq!(result, Err(Error::InvalidDate("yesterday".to_owned())));
    }

    #[test]
    fn checks_amount_before_other_fields() {
        let result = CreateExpenseRequest {
            amount: Some(-1.0),
            date: Some("not a date".to_owned()),
            note: None,
            category: Some("Groceries".to_owned()),
        }
        .validate(UtcOffset::UTC);

        assert_eq!(result, Err(Error::InvalidAmount));
    }

    #[test]
    fn rejects_non_finite_amount_before_date() {
        let result = CreateExpenseRequest {
            amount: Some(f64::INFINITY),
            date: Some("not a date".to_owned()),
            ..Default::default()
        }
        .validate(UtcOffset::UTC);

        assert_eq!(result, Err(Error::InvalidAmount));
    }
}


#[cfg(test)]
mod parse_date_tests {
    use time::{UtcOffset, macros::date, macros::offset};

    use crate::Error;

    use super::parse_date;

    #[test]
    fn parses_calendar_date() {
        assert_eq!(
            parse_date("2025-01-15", UtcOffset::UTC),
            Ok(date!(2025 - 01 - 15))
        );
    }

    #[test]
    fn parses_rfc3339_date_time() {
        assert_eq!(
            parse_date("2025-01-15T09:30:00.000Z", UtcOffset::UTC),
            Ok(date!(2025 - 01 - 15))
        );
    }

    #[test]
    fn converts_date_time_to_local_date() {
        assert_eq!(
            parse_date("2025-01-15T20:00:00Z", offset!(+13)),
            Ok(date!(2025 - 01 - 16))
        );
    }

    #[test]
    fn rejects_impossible_date() {
        assert_eq!(
            parse_date("2025-02-30", UtcOffset::UTC),
            Err(Error::InvalidDate("2025-02-30".to_owned()))
        );
    }
}
