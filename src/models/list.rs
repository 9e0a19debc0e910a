use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::ToDo;

/// Represents a to-do list as stored in the database.
///
/// A list has exactly one owner, fixed at creation. Its item set is the set of
/// `todos` rows referencing it and is only ever mutated through the list and
/// to-do services.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct List {
    pub id: Uuid,
    /// Globally unique across all lists, stored trimmed.
    pub name: String,
    /// The owning user. Immutable after creation.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input structure for creating a list. The owner is taken from the
/// authenticated requester, never from the body.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ListInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Patch structure for updating a list.
///
/// Enumerates the mutable field set explicitly; unknown fields are rejected at
/// deserialization rather than silently applied.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ListUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

/// A list together with its resolved items, as returned by
/// `GET /todo/list/{id}`.
#[derive(Debug, Serialize)]
pub struct ListWithItems {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ToDo>,
}

impl ListWithItems {
    pub fn new(list: List, items: Vec<ToDo>) -> Self {
        Self {
            id: list.id,
            name: list.name,
            user_id: list.user_id,
            created_at: list.created_at,
            items,
        }
    }
}
