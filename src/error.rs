//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! various error conditions, from malformed identifiers to uniqueness violations.
//!
//! `AppError` implements `actix_web::error::ResponseError` so that any error returned
//! from a handler is rendered as the standard `{status, message, data, error}` envelope.
//! `From` trait implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError` and `uuid::Error` allow easy
//! conversion via the `?` operator; the `sqlx::Error` conversion is the adapter that
//! classifies raw persistence failures into the domain taxonomy.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// Each variant carries a message detailing the issue and maps to a fixed
/// HTTP status. Services raise authorization and not-found variants directly;
/// persistence failures are classified by [`adapt_db_error`].
#[derive(Debug)]
pub enum AppError {
    /// Malformed input or a business-rule violation such as a password mismatch (HTTP 400).
    BadRequest(String),
    /// A path identifier that is not a well-formed UUID (HTTP 400).
    InvalidId(String),
    /// The requester is authenticated but is not the owner of the resource,
    /// or presented no valid credentials at all (HTTP 401).
    Unauthorized(String),
    /// The requester lacks the role required for the operation (HTTP 403).
    Forbidden(String),
    /// The requested entity does not exist or the identifier does not resolve (HTTP 404).
    NotFound(String),
    /// Schema-level validation of a request body failed (HTTP 422).
    ValidationError(String),
    /// A uniqueness constraint was violated, e.g. a duplicate email or list name (HTTP 409).
    DuplicateKey(String),
    /// An uncategorized persistence failure (HTTP 500).
    DatabaseError(String),
    /// An unexpected server-side error not covered by a more specific variant (HTTP 500).
    InternalServerError(String),
    /// Required process configuration is missing; raised at startup (HTTP 500).
    InvalidEnv(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DuplicateKey(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::InvalidEnv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::InvalidId(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg)
            | AppError::DuplicateKey(msg)
            | AppError::DatabaseError(msg)
            | AppError::InternalServerError(msg)
            | AppError::InvalidEnv(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::InvalidId(msg) => write!(f, "Invalid ID: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DuplicateKey(msg) => write!(f, "Duplicate Key: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::InvalidEnv(msg) => write!(f, "Invalid Environment: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This is the single top-level error handler: every error that escapes a
/// handler is rendered here as the standard envelope, with the `error` object
/// populated and `data` null. Only the domain message is exposed; stack traces
/// and driver-level detail never reach the response body.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        HttpResponse::build(status).json(json!({
            "status": status.as_u16(),
            "message": self.message(),
            "data": null,
            "error": {
                "status": status.as_u16(),
                "message": self.message(),
            }
        }))
    }
}

/// Classifies a raw `sqlx::Error` into the domain taxonomy.
///
/// - `RowNotFound` becomes `NotFound`.
/// - Unique-constraint violations (SQLSTATE 23505) become `DuplicateKey`,
///   kept distinct from generic validation failures.
/// - Other integrity violations (foreign-key, not-null, check) become
///   `ValidationError`.
/// - Everything else becomes `DatabaseError`, with driver detail logged but
///   kept out of the client-facing message.
pub fn adapt_db_error(error: sqlx::Error) -> AppError {
    match error {
        sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => AppError::DuplicateKey("Duplicate key error".into()),
            Some("23502") | Some("23503") | Some("23514") => {
                AppError::ValidationError(db_err.message().to_string())
            }
            _ => {
                log::error!("Unclassified database error: {}", db_err);
                AppError::DatabaseError("Database error".into())
            }
        },
        other => {
            log::error!("Database failure: {}", other);
            AppError::DatabaseError("Database error".into())
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        adapt_db_error(error)
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
///
/// This is typically used when JWT processing (e.g., verification) fails.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
///
/// This handles errors during password hashing or verification.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Converts a UUID parse failure into `AppError::InvalidId`.
impl From<uuid::Error> for AppError {
    fn from(error: uuid::Error) -> AppError {
        AppError::InvalidId(format!("Invalid ID format: {}", error))
    }
}
