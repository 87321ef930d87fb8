use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Responds to requests on a known route with a method it does not handle.
pub async fn get_405_method_not_supported() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not supported").into_response()
}
