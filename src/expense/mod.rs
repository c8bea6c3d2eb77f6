//! Expenses: the model, validation, owner-scoped queries, spending summaries
//! and the route handlers.

mod category;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;
mod query;
mod state;
mod summary;
mod summary_endpoint;
mod update_endpoint;
pub mod validation;

pub use category::Category;
pub use core::{
    Expense, ExpenseId, ExpenseUpdate, NewExpense, create_expense, create_expense_table,
    delete_expense, get_expense, parse_expense_id, update_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::{DeleteResponse, delete_expense_endpoint};
pub use get_endpoint::{ExpenseResponse, get_expense_endpoint};
pub use list_endpoint::{ExpenseListResponse, list_expenses_endpoint};
pub use query::{ExpenseFilter, ListExpensesQuery, query_expenses};
pub use state::ExpenseState;
pub use summary::{
    CategoryTotal, MonthTotal, Summary, TotalSpent, YearMonth, summarize, summarize_expenses,
};
pub use summary_endpoint::{SummaryResponse, get_summary_endpoint};
pub use update_endpoint::update_expense_endpoint;
