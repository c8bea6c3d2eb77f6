use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    Error, UserID,
    expense::{ExpenseResponse, ExpenseState, create_expense, validation::CreateExpenseRequest},
};

/// A route handler for creating a new expense owned by the authenticated user.
///
/// Any `owner` in the request body is ignored.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(owner): Extension<UserID>,
    body: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseResponse>), Error> {
    let Json(request) = body?;
    let new_expense = request.validate(state.local_offset()?)?;

    let expense = create_expense(owner, new_expense, &*state.connection()?)?;

    tracing::debug!("user {owner} created expense {}", expense.id);

    Ok((StatusCode::CREATED, Json(ExpenseResponse::new(expense))))
}
