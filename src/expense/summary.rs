//! Spending totals for a user's expenses.
//!
//! The summary is made of three independent reductions over the same slice of
//! expenses: the overall total, the total per category and the total per
//! calendar month.

use std::collections::{BTreeMap, HashMap};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserID,
    expense::{Category, Expense, query::ExpenseFilter, query_expenses},
};

/// The overall total, grouped under a null key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalSpent {
    /// Always `null`.
    #[serde(rename = "_id")]
    pub id: (),
    /// The sum of all amounts.
    pub total: f64,
}

/// The total for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category the total is for.
    #[serde(rename = "_id")]
    pub category: Category,
    /// The sum of the amounts in the category.
    pub total: f64,
}

/// A calendar month, e.g. `{"year": 2025, "month": 1}` for January 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    /// The calendar year.
    pub year: i32,
    /// The month of the year, starting at 1 for January.
    pub month: u8,
}

/// The total for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    /// The month the total is for.
    #[serde(rename = "_id")]
    pub month: YearMonth,
    /// The sum of the amounts dated in the month.
    pub total: f64,
}

/// Spending totals for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// One entry with the overall total, or empty if there are no expenses.
    pub total_spent: Vec<TotalSpent>,
    /// One entry per category that has expenses, largest total first.
    pub by_category: Vec<CategoryTotal>,
    /// One entry per month that has expenses, oldest first.
    pub by_month: Vec<MonthTotal>,
}

/// Sum the amounts of `expenses`.
///
/// Returns an empty list if there are no expenses.
pub fn total_spent(expenses: &[Expense]) -> Vec<TotalSpent> {
    if expenses.is_empty() {
        return Vec::new();
    }

    vec![TotalSpent {
        id: (),
        total: expenses.iter().map(|expense| expense.amount).sum(),
    }]
}

/// Sum the amounts of `expenses` per category.
///
/// Categories without expenses are left out. Ties are ordered by category name.
pub fn total_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, f64> = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    let mut totals: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    totals
}

/// Sum the amounts of `expenses` per calendar month of the expense date.
pub fn total_by_month(expenses: &[Expense]) -> Vec<MonthTotal> {
    let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();

    for expense in expenses {
        let month = YearMonth {
            year: expense.date.year(),
            month: expense.date.month().into(),
        };
        *totals.entry(month).or_insert(0.0) += expense.amount;
    }

    totals
        .into_iter()
        .map(|(month, total)| MonthTotal { month, total })
        .collect()
}

/// Compute the [Summary] of `expenses`.
pub fn summarize_expenses(expenses: &[Expense]) -> Summary {
    Summary {
        total_spent: total_spent(expenses),
        by_category: total_by_category(expenses),
        by_month: total_by_month(expenses),
    }
}

/// Compute the [Summary] of every expense owned by `owner`.
///
/// # Errors
/// Returns [Error::SqlError] if the expenses cannot be loaded.
pub fn summarize(owner: UserID, connection: &Connection) -> Result<Summary, Error> {
    let expenses = query_expenses(owner, &ExpenseFilter::default(), None, connection)?;

    Ok(summarize_expenses(&expenses))
}
