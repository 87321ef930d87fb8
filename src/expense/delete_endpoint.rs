//! Defines the endpoint for deleting expenses.
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

/// The state needed to delete expenses.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The store holding all expenses.
    pub expense_store: Arc<Mutex<ExpenseStore>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
        }
    }
}

/// A route handler for deleting every expense that matches the date,
/// description and amount in the JSON body.
///
/// Responds with 200 OK even if no expenses matched.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    body: Bytes,
) -> Response {
    let target: Expense = match serde_json::from_slice(&body) {
        Ok(target) => target,
        Err(error) => {
            tracing::error!("could not parse expense from request body: {error}");
            return Error::from(error).into_response();
        }
    };

    let Expense {
        date,
        description,
        amount,
    } = target.clone();
    let result = update_store(state.expense_store, move |store| {
        store.remove(date, &description, amount)
    })
    .await;

    match result {
        Ok(removed) => {
            tracing::debug!("Removed {removed} expenses matching {target:?}");
            (StatusCode::OK, "Expense deleted successfully").into_response()
        }
        Err(error) => {
            tracing::error!("could not delete expense {target:?}: {error}");
            error.into_response()
        }
    }
}
