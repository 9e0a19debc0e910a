//! ToDo endpoints. Ownership is always resolved through the containing list
//! in the service layer; the unscoped listing is admin-only.

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ToDoInput, ToDoUpdate},
    response, services,
};
use actix_web::{delete, get, post, put, web, Responder};
use sqlx::PgPool;

/// Create a to-do under a list the requester owns.
#[post("/{list_id}")]
pub async fn create_todo(
    pool: web::Data<PgPool>,
    list_id: web::Path<String>,
    requester: AuthenticatedUser,
    data: web::Json<ToDoInput>,
) -> Result<impl Responder, AppError> {
    let todo =
        services::todos::create_todo(&pool, &list_id, requester.id, data.into_inner()).await?;
    Ok(response::created("ToDo created successfully", todo))
}

/// List every to-do across all owners. Admin-only.
#[get("")]
pub async fn get_todos(
    pool: web::Data<PgPool>,
    requester: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = services::todos::get_todos(&pool, requester.id).await?;
    Ok(response::ok("ToDos found", todos))
}

/// Fetch an owned list with its items populated.
#[get("/list/{id}")]
pub async fn get_todos_by_list_id(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
    requester: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let list = services::todos::get_todos_by_list_id(&pool, requester.id, &id).await?;
    Ok(response::ok("List found", list))
}

#[get("/{id}")]
pub async fn get_todo_by_id(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
    requester: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todo = services::todos::get_todo_by_id(&pool, requester.id, &id).await?;
    Ok(response::ok("ToDo found", todo))
}

#[put("/{id}")]
pub async fn update_todo(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
    requester: AuthenticatedUser,
    patch: web::Json<ToDoUpdate>,
) -> Result<impl Responder, AppError> {
    let todo = services::todos::update_todo(&pool, &id, requester.id, patch.into_inner()).await?;
    Ok(response::ok("ToDo updated successfully", todo))
}

#[delete("/{id}")]
pub async fn delete_todo(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
    requester: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todo = services::todos::delete_todo(&pool, requester.id, &id).await?;
    Ok(response::ok("ToDo deleted successfully", todo))
}
