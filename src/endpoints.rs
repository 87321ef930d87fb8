//! The API endpoints URIs.

/// The route to list, create and delete expenses.
pub const EXPENSES: &str = "/expenses";
