//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use crate::expense::ExpenseStore;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The expenses, shared between request handlers.
    ///
    /// Handlers must hold the lock for the whole of a read-modify-save
    /// sequence so that saves never interleave.
    pub expense_store: Arc<Mutex<ExpenseStore>>,
}

impl AppState {
    /// Create a new [AppState] that serves the expenses in `expense_store`.
    pub fn new(expense_store: ExpenseStore) -> Self {
        Self {
            expense_store: Arc::new(Mutex::new(expense_store)),
        }
    }
}
