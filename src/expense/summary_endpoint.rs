use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserID,
    expense::{ExpenseState, Summary, summarize},
};

/// The response body for the spending summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Always `true`.
    pub success: bool,
    /// The spending totals.
    pub summary: Summary,
}

/// A route handler for the authenticated user's spending totals.
pub async fn get_summary_endpoint(
    State(state): State<ExpenseState>,
    Extension(owner): Extension<UserID>,
) -> Result<Json<SummaryResponse>, Error> {
    let summary = summarize(owner, &*state.connection()?)?;

    Ok(Json(SummaryResponse {
        success: true,
        summary,
    }))
}
