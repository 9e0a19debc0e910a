//! ToDo CRUD with transitive ownership.
//!
//! A to-do has no owner of its own: every authorization decision here first
//! resolves the containing list and checks that list's owner against the
//! requester. Mutation keeps that two-step shape — resolve the owning list,
//! authorize, then act on the to-do by its own id.

use crate::error::AppError;
use crate::models::{List, ListWithItems, ToDo, ToDoInput, ToDoUpdate, User, UserRole};
use crate::services::parse_id;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TODO_COLUMNS: &str = "id, name, done, list_id, created_at";

/// Creates a to-do under a list the requester owns.
///
/// The list must exist and belong to the requester. Membership is the
/// `list_id` reference, so the to-do and the list's item set change in a
/// single write; a partially-linked to-do cannot exist.
pub async fn create_todo(
    pool: &PgPool,
    list_id: &str,
    requester_id: Uuid,
    input: ToDoInput,
) -> Result<ToDo, AppError> {
    input.validate()?;
    let list_id = parse_id(list_id)?;

    let list = sqlx::query_as::<_, List>("SELECT id, name, user_id, created_at FROM lists WHERE id = $1")
        .bind(list_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".into()))?;

    if list.user_id != requester_id {
        return Err(AppError::Unauthorized(
            "You are not allowed to create a ToDo in this list, try creating a new list".into(),
        ));
    }

    let todo = sqlx::query_as::<_, ToDo>(&format!(
        "INSERT INTO todos (id, name, done, list_id) VALUES ($1, $2, $3, $4) RETURNING {}",
        TODO_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(input.name.trim())
    .bind(input.done)
    .bind(list.id)
    .fetch_one(pool)
    .await?;

    Ok(todo)
}

/// Returns every to-do across all owners. Admin-only.
pub async fn get_todos(pool: &PgPool, requester_id: Uuid) -> Result<Vec<ToDo>, AppError> {
    let requester = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(requester_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if requester.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "You're not authorized to access this route, because you don't have the necessary permissions"
                .into(),
        ));
    }

    let todos = sqlx::query_as::<_, ToDo>(&format!(
        "SELECT {} FROM todos ORDER BY created_at DESC",
        TODO_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(todos)
}

/// Returns an owned list with its items populated.
pub async fn get_todos_by_list_id(
    pool: &PgPool,
    requester_id: Uuid,
    id: &str,
) -> Result<ListWithItems, AppError> {
    let list_id = parse_id(id)?;

    let list = sqlx::query_as::<_, List>("SELECT id, name, user_id, created_at FROM lists WHERE id = $1")
        .bind(list_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                "To-do list not found, perhaps it doesn't exist or the id might be invalid".into(),
            )
        })?;

    if list.user_id != requester_id {
        return Err(AppError::Unauthorized(
            "You are not allowed to view this list because it's not yours, try creating a new list"
                .into(),
        ));
    }

    let items = sqlx::query_as::<_, ToDo>(&format!(
        "SELECT {} FROM todos WHERE list_id = $1 ORDER BY created_at",
        TODO_COLUMNS
    ))
    .bind(list.id)
    .fetch_all(pool)
    .await?;

    Ok(ListWithItems::new(list, items))
}

/// Resolves the owner of the list containing `todo_id`.
///
/// `None` means no list references the to-do (an orphan, or the to-do does
/// not exist at all) — callers report that as `NotFound`.
async fn resolve_owner(pool: &PgPool, todo_id: Uuid) -> Result<Option<Uuid>, AppError> {
    let owner = sqlx::query_scalar::<_, Uuid>(
        "SELECT l.user_id FROM lists l JOIN todos t ON t.list_id = l.id WHERE t.id = $1",
    )
    .bind(todo_id)
    .fetch_optional(pool)
    .await?;

    Ok(owner)
}

/// Fetches a single to-do, authorized through its containing list's owner.
///
/// A malformed id is reported as `NotFound` here (not `InvalidId`): the
/// caller cannot distinguish an id that never existed from one that cannot
/// exist.
pub async fn get_todo_by_id(pool: &PgPool, requester_id: Uuid, id: &str) -> Result<ToDo, AppError> {
    let todo_id = Uuid::parse_str(id).map_err(|_| {
        AppError::NotFound(
            "To-do not found, perhaps it doesn't exist or the id might be invalid".into(),
        )
    })?;

    let todo = sqlx::query_as::<_, ToDo>(&format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS))
        .bind(todo_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("ToDo not found".into()))?;

    let owner = resolve_owner(pool, todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound("ToDo not found".into()))?;

    if owner != requester_id {
        return Err(AppError::Unauthorized("You are not allowed to view this ToDo".into()));
    }

    Ok(todo)
}

/// Applies a validated patch to a to-do owned (transitively) by the requester.
pub async fn update_todo(
    pool: &PgPool,
    id: &str,
    requester_id: Uuid,
    patch: ToDoUpdate,
) -> Result<ToDo, AppError> {
    patch.validate()?;
    let todo_id = Uuid::parse_str(id).map_err(|_| {
        AppError::NotFound(
            "To-do not found, perhaps it doesn't exist or the id might be invalid".into(),
        )
    })?;

    let owner = resolve_owner(pool, todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound("ToDo not found".into()))?;

    if owner != requester_id {
        return Err(AppError::Unauthorized("You are not allowed to update this ToDo".into()));
    }

    let name = patch.name.map(|n| n.trim().to_string());

    let updated = sqlx::query_as::<_, ToDo>(&format!(
        "UPDATE todos SET name = COALESCE($1, name), done = COALESCE($2, done) \
         WHERE id = $3 RETURNING {}",
        TODO_COLUMNS
    ))
    .bind(name)
    .bind(patch.done)
    .bind(todo_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("ToDo not found".into()))?;

    Ok(updated)
}

/// Deletes a to-do owned (transitively) by the requester.
///
/// Two steps on purpose: ownership is resolved through the containing list
/// first, and the delete then addresses the to-do by its own id only.
/// Removing the row also removes it from the list's item set, so no dangling
/// reference is left behind.
pub async fn delete_todo(pool: &PgPool, requester_id: Uuid, id: &str) -> Result<ToDo, AppError> {
    let todo_id = Uuid::parse_str(id).map_err(|_| {
        AppError::NotFound(
            "To-do not found, perhaps it doesn't exist or the id might be invalid".into(),
        )
    })?;

    let owner = resolve_owner(pool, todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound("ToDo not found".into()))?;

    if owner != requester_id {
        return Err(AppError::Unauthorized("You are not allowed to delete this ToDo".into()));
    }

    let deleted = sqlx::query_as::<_, ToDo>(&format!(
        "DELETE FROM todos WHERE id = $1 RETURNING {}",
        TODO_COLUMNS
    ))
    .bind(todo_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("ToDo not found".into()))?;

    Ok(deleted)
}
