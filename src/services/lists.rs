//! List CRUD with single-owner access control.
//!
//! Check order for addressed operations: malformed id, then existence, then
//! ownership. Only the owner may read, update or delete a list; creation binds
//! the list to the requester.

use crate::error::AppError;
use crate::models::{List, ListInput, ListUpdate};
use crate::services::parse_id;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const LIST_COLUMNS: &str = "id, name, user_id, created_at";

/// Creates a list owned by `owner_id` with an empty item set.
///
/// A duplicate name surfaces as `DuplicateKey` through the error adapter.
pub async fn create_list(pool: &PgPool, owner_id: Uuid, input: ListInput) -> Result<List, AppError> {
    input.validate()?;

    let list = sqlx::query_as::<_, List>(&format!(
        "INSERT INTO lists (id, name, user_id) VALUES ($1, $2, $3) RETURNING {}",
        LIST_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(input.name.trim())
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(list)
}

/// Returns every list, regardless of requester.
///
/// Deliberately not owner-scoped: only the by-id operations enforce
/// ownership. Administrative/debug surface inherited from the system this
/// replaces; see DESIGN.md before changing it.
pub async fn get_lists(pool: &PgPool) -> Result<Vec<List>, AppError> {
    let lists = sqlx::query_as::<_, List>(&format!(
        "SELECT {} FROM lists ORDER BY created_at DESC",
        LIST_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(lists)
}

async fn load_owned_list(pool: &PgPool, requester_id: Uuid, id: &str, action: &str) -> Result<List, AppError> {
    let list_id = parse_id(id)?;

    let list = sqlx::query_as::<_, List>(&format!(
        "SELECT {} FROM lists WHERE id = $1",
        LIST_COLUMNS
    ))
    .bind(list_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("List not found".into()))?;

    if list.user_id != requester_id {
        return Err(AppError::Unauthorized(format!(
            "You are not authorized to {} this list, because you are not the owner",
            action
        )));
    }

    Ok(list)
}

pub async fn get_list_by_id(pool: &PgPool, requester_id: Uuid, id: &str) -> Result<List, AppError> {
    load_owned_list(pool, requester_id, id, "access").await
}

/// Applies a validated patch to an owned list and returns the updated entity.
pub async fn update_list(
    pool: &PgPool,
    requester_id: Uuid,
    id: &str,
    patch: ListUpdate,
) -> Result<List, AppError> {
    patch.validate()?;
    let list = load_owned_list(pool, requester_id, id, "update").await?;

    let name = patch.name.map(|n| n.trim().to_string());

    let updated = sqlx::query_as::<_, List>(&format!(
        "UPDATE lists SET name = COALESCE($1, name) WHERE id = $2 RETURNING {}",
        LIST_COLUMNS
    ))
    .bind(name)
    .bind(list.id)
    .fetch_one(pool)
    .await?;

    Ok(updated)
}

/// Deletes an owned list. The persistence boundary releases the list's items
/// (FK cascade), so no dangling item references survive the delete.
pub async fn delete_list(pool: &PgPool, requester_id: Uuid, id: &str) -> Result<(), AppError> {
    let list = load_owned_list(pool, requester_id, id, "delete").await?;

    sqlx::query("DELETE FROM lists WHERE id = $1")
        .bind(list.id)
        .execute(pool)
        .await?;

    Ok(())
}
