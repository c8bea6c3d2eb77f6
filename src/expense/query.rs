//! Database query helpers for listing a user's expenses.

use rusqlite::{Connection, ToSql};
use serde::Deserialize;
use time::{Date, UtcOffset};

use crate::{
    Error, UserID,
    expense::{
        Category, Expense,
        core::map_expense_row,
        validation::{non_empty, parse_date},
    },
};

/// The query string parameters accepted by the expense listing endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExpensesQuery {
    /// Only include expenses in this category. Empty means any category.
    pub category: Option<String>,
    /// Only include expenses on or after this date.
    pub start_date: Option<String>,
    /// Only include expenses on or before this date.
    pub end_date: Option<String>,
}

impl ListExpensesQuery {
    /// Parse the raw query parameters into an [ExpenseFilter].
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] or [Error::InvalidDate] if a non-empty
    /// parameter cannot be parsed.
    pub fn into_filter(self, local_offset: UtcOffset) -> Result<ExpenseFilter, Error> {
        Ok(ExpenseFilter {
            category: non_empty(self.category)
                .map(|category| category.parse())
                .transpose()?,
            start_date: non_empty(self.start_date)
                .map(|date| parse_date(&date, local_offset))
                .transpose()?,
            end_date: non_empty(self.end_date)
                .map(|date| parse_date(&date, local_offset))
                .transpose()?,
        })
    }
}

/// Conditions that listed expenses must all satisfy, in addition to belonging
/// to the requesting user.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpenseFilter {
    /// Exact category match.
    pub category: Option<Category>,
    /// Inclusive lower bound on the expense date.
    pub start_date: Option<Date>,
    /// Inclusive upper bound on the expense date.
    pub end_date: Option<Date>,
}

/// Get the expenses owned by `owner` that match `filter`, newest first.
///
/// Expenses on the same date are ordered by when they were recorded, most
/// recent first, and then by ID. At most `limit` expenses are returned if a
/// limit is given.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped to
/// an [Expense].
pub fn query_expenses(
    owner: UserID,
    filter: &ExpenseFilter,
    limit: Option<u32>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let mut where_clauses = vec!["owner_id = ?"];
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(owner.as_i64())];

    if let Some(category) = filter.category {
        where_clauses.push("category = ?");
        params.push(Box::new(category));
    }

    if let Some(start_date) = filter.start_date {
        where_clauses.push("date >= ?");
        params.push(Box::new(start_date));
    }

    if let Some(end_date) = filter.end_date {
        where_clauses.push("date <= ?");
        params.push(Box::new(end_date));
    }

    let mut query = format!(
        "SELECT id, amount, date, note, category, owner_id, created_at FROM expense \
         WHERE {} \
         ORDER BY date DESC, created_at DESC, id DESC",
        where_clauses.join(" AND ")
    );

    if let Some(limit) = limit {
        query.push_str(" LIMIT ?");
        params.push(Box::new(limit));
    }

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|param| param.as_ref()).collect();

    connection
        .prepare(&query)?
        .query_map(param_refs.as_slice(), map_expense_row)?
        .map(|expense_result| expense_result.map_err(Error::SqlError))
        .collect()
}
