//! The success-side response envelope.
//!
//! Every endpoint answers with the same shape: `{status, message, data, error}`.
//! Successful calls fill `data` and leave `error` null; the error side of the
//! envelope is produced by the `ResponseError` impl in [`crate::error`].

use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
    pub error: Option<()>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Renders the envelope with its embedded status as the HTTP status.
    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        HttpResponse::build(status).json(self)
    }
}

/// Shorthand for a `200 OK` envelope.
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    ApiResponse::new(StatusCode::OK, message, data).into_response()
}

/// Shorthand for a `201 Created` envelope.
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    ApiResponse::new(StatusCode::CREATED, message, data).into_response()
}
