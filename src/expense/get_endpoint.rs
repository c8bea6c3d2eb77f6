use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserID,
    expense::{Expense, ExpenseState, get_expense, parse_expense_id},
};

/// The response body for endpoints that return a single expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseResponse {
    /// Always `true`.
    pub success: bool,
    /// The expense.
    pub expense: Expense,
}

impl ExpenseResponse {
    pub(crate) fn new(expense: Expense) -> Self {
        Self {
            success: true,
            expense,
        }
    }
}

/// A route handler for getting one of the authenticated user's expenses.
///
/// Expenses that belong to other users are reported as not found.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(owner): Extension<UserID>,
    Path(raw_id): Path<String>,
) -> Result<Json<ExpenseResponse>, Error> {
    let id = parse_expense_id(&raw_id)?;

    let expense = get_expense(id, owner, &*state.connection()?)?;

    Ok(Json(ExpenseResponse::new(expense)))
}
