use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    Error, UserID,
    expense::{
        ExpenseResponse, ExpenseState, parse_expense_id, update_expense,
        validation::UpdateExpenseRequest,
    },
};

/// A route handler for changing some of the fields of an expense.
///
/// The whole request is validated before the database is touched, so a
/// request with one bad field changes nothing.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(owner): Extension<UserID>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateExpenseRequest>, JsonRejection>,
) -> Result<Json<ExpenseResponse>, Error> {
    let id = parse_expense_id(&raw_id)?;
    let Json(request) = body?;
    let update = request.validate(state.local_offset()?)?;

    let expense = update_expense(id, owner, update, &*state.connection()?)?;

    Ok(Json(ExpenseResponse::new(expense)))
}
