use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a single task item as stored in the database.
///
/// A to-do carries no owner of its own: `list_id` records which list contains
/// it (at most one), and the owner is resolved transitively through that list.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct ToDo {
    pub id: Uuid,
    pub name: String,
    pub done: bool,
    /// The containing list. Exclusive: a to-do belongs to one list at a time.
    pub list_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input structure for creating a to-do under a list.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ToDoInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

/// Patch structure for updating a to-do.
///
/// Enumerates the mutable field set explicitly; unknown fields are rejected at
/// deserialization rather than silently applied.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ToDoUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub done: Option<bool>,
}
