//! Defines the response sent to the client when a request cannot be served.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// A plain text 500 response carrying a fixed, human readable message.
///
/// The underlying error is never shown to the client, handlers should log it
/// before converting it into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalServerError {
    message: &'static str,
}

impl InternalServerError {
    /// Create a 500 response with the body `message`.
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl IntoResponse for InternalServerError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.message).into_response()
    }
}
