//! The API endpoint URIs.
//!
//! Endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', are
//! routed with the parameter in place and called with the ID substituted.

/// The root route, used as a health check.
pub const ROOT: &str = "/";
/// The route for registering a new user.
pub const REGISTER: &str = "/api/user/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/user/login";
/// The route for getting the authenticated user.
pub const ME: &str = "/api/user/me";
/// The route to create and list expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route for the spending summary of the authenticated user.
pub const EXPENSE_SUMMARY: &str = "/api/expenses/summary";
/// The route to access a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/expenses/{expense_id}',
/// '{expense_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
#[cfg(test)]
pub(crate) fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
