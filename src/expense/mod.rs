//! Expense management for the expense tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and its JSON representation
//! - The `ExpenseStore` that keeps expenses in memory and mirrors them to a JSON file
//! - Route handlers for listing, creating and deleting expenses

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod store;

pub use self::core::Expense;
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use store::{DEFAULT_EXPENSES_PATH, ExpenseStore};
