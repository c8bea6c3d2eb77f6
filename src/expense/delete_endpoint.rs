use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserID,
    expense::{ExpenseState, delete_expense, parse_expense_id},
};

/// The response body for a deleted expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `true`.
    pub success: bool,
    /// A confirmation message.
    pub message: String,
}

/// A route handler for deleting an expense.
///
/// Deleting an expense that has already been deleted, or that belongs to
/// another user, gives a 404 response.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(owner): Extension<UserID>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>, Error> {
    let id = parse_expense_id(&raw_id)?;

    delete_expense(id, owner, &*state.connection()?)?;

    tracing::debug!("user {owner} deleted expense {id}");

    Ok(Json(DeleteResponse {
        success: true,
        message: "Expense deleted successfully".to_owned(),
    }))
}
