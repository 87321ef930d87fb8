//! Defines the app level error type and its conversion to a plain text response.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body could not be parsed as an expense.
    ///
    /// This covers malformed JSON, missing or wrongly typed fields, and dates
    /// that are not in the `YYYY-MM-DD` format.
    #[error("{0}")]
    InvalidExpense(String),

    /// The expenses file could not be written.
    ///
    /// The in-memory expenses are left as they were after the mutation, so
    /// the file is stale until the next successful save.
    #[error("could not save expenses: {0}")]
    SaveFailed(String),

    /// Could not acquire the expense store lock
    #[error("could not acquire the expense store lock")]
    StoreLockError,

    /// The blocking task that updates the expense store panicked or was cancelled.
    #[error("the expense store update did not finish: {0}")]
    StoreTaskFailed(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Error::StoreTaskFailed(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::InvalidExpense(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("An error occurred while handling a request: {self:?}");

        (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {self}")).into_response()
    }
}
