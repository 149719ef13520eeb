//! JSON error responses.

use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;

/// A handler failure: a status, a short message and optionally the text of
/// the underlying error.
///
/// Rendered as `{"error": "<message>", "details": "<text>"}`, with `details`
/// omitted when there is none.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: Status,
    message: &'static str,
    details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: Status, message: &'static str) -> Self {
        Self { status, message, details: None }
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(Status::BadRequest, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(Status::Unauthorized, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(Status::Forbidden, message)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(Status::NotFound, message)
    }

    pub fn internal(message: &'static str) -> Self {
        Self::new(Status::InternalServerError, message)
    }

    pub fn with_details(mut self, cause: impl Display) -> Self {
        self.details = Some(cause.to_string());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, details: self.details.as_deref() };
        (self.status, Json(body)).into_response()
    }
}
