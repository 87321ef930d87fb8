//! Application router configuration.

use axum::{Router, routing::get};

use crate::{
    AppState, endpoints,
    expense::{create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint},
    not_found::{get_404_not_found, get_405_method_not_supported},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint)
                // `get` also answers HEAD unless HEAD has its own handler.
                .head(get_405_method_not_supported)
                .post(create_expense_endpoint)
                .delete(delete_expense_endpoint)
                .fallback(get_405_method_not_supported),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}
