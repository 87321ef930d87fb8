//! Defines the endpoint for creating a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    expense::{Expense, ExpenseStore, store::update_store},
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The store holding all expenses.
    pub expense_store: Arc<Mutex<ExpenseStore>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
        }
    }
}

/// A route handler for adding an expense.
///
/// The body must be a JSON object with the fields `date` (`YYYY-MM-DD`),
/// `description` and `amount`. The `Content-Type` header is not checked.
/// Any parse or save failure is a 500 with the error message as plain text.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    body: Bytes,
) -> Response {
    let expense: Expense = match serde_json::from_slice(&body) {
        Ok(expense) => expense,
        Err(error) => {
            tracing::error!("could not parse expense from request body: {error}");
            return Error::from(error).into_response();
        }
    };

    let result = update_store(state.expense_store, move |store| store.add(expense)).await;

    if let Err(error) = result {
        tracing::error!("could not add expense: {error}");
        return error.into_response();
    }

    (StatusCode::OK, "Expense added successfully").into_response()
}
