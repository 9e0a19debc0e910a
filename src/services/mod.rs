//! Business-rule layer between the HTTP handlers and Postgres.
//!
//! All ownership-authorization decisions live here: the handlers only resolve
//! the requester's identity and translate results into the response envelope.
//! Persistence failures funnel through the adapter in [`crate::error`]; the
//! authorization and not-found checks below raise domain errors directly.

pub mod lists;
pub mod todos;
pub mod users;

use crate::error::AppError;
use uuid::Uuid;

/// Parses a path identifier, mapping malformed input to `InvalidId`.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(AppError::from)
}
