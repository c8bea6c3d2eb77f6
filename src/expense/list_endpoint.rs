use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserID,
    expense::{Expense, ExpenseState, ListExpensesQuery, query_expenses},
};

/// The response body for a listing of expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    /// Always `true`.
    pub success: bool,
    /// The matching expenses, newest first.
    pub expenses: Vec<Expense>,
}

/// A route handler for listing the authenticated user's expenses.
///
/// The query parameters `category`, `startDate` and `endDate` narrow down the
/// listing. Date bounds are inclusive.
pub async fn list_expenses_endpoint(
    State(state): State<ExpenseState>,
    Extension(owner): Extension<UserID>,
    query: Result<Query<ListExpensesQuery>, QueryRejection>,
) -> Result<Json<ExpenseListResponse>, Error> {
    let Query(query) = query.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let filter = query.into_filter(state.local_offset()?)?;

    // Ask for one extra row to find out whether the listing was cut short.
    let limit = state.max_expenses.saturating_add(1);
    let mut expenses = query_expenses(owner, &filter, Some(limit), &*state.connection()?)?;

    if expenses.len() > state.max_expenses as usize {
        tracing::warn!(
            "listing for user {owner} truncated to {} expenses",
            state.max_expenses
        );
        expenses.truncate(state.max_expenses as usize);
    }

    Ok(Json(ExpenseListResponse {
        success: true,
        expenses,
    }))
}
