//! Defines the endpoint for listing all expenses.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, expense::ExpenseStore};

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The store holding all expenses.
    pub expense_store: Arc<Mutex<ExpenseStore>>,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
        }
    }
}

/// A route handler that responds with every expense as a JSON array, in the
/// order they were added.
pub async fn list_expenses_endpoint(State(state): State<ListExpensesState>) -> Response {
    let store = match state.expense_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire expense store lock: {error}");
            return Error::StoreLockError.into_response();
        }
    };

    Json(store.list()).into_response()
}
