//! List endpoints. All of them sit behind the session middleware; the by-id
//! operations are owner-scoped in the service layer.

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ListInput, ListUpdate},
    response, services,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;

/// Create a list owned by the requester.
#[post("")]
pub async fn create_list(
    pool: web::Data<PgPool>,
    requester: AuthenticatedUser,
    data: web::Json<ListInput>,
) -> Result<impl Responder, AppError> {
    let list = services::lists::create_list(&pool, requester.id, data.into_inner()).await?;
    Ok(response::created("List created successfully", list))
}

/// List every list. Not owner-scoped; see `services::lists::get_lists`.
#[get("")]
pub async fn get_lists(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let lists = services::lists::get_lists(&pool).await?;
    Ok(response::ok("Lists found", lists))
}

#[get("/{id}")]
pub async fn get_list_by_id(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
    requester: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let list = services::lists::get_list_by_id(&pool, requester.id, &id).await?;
    Ok(response::ok("List found", list))
}

#[put("/{id}")]
pub async fn update_list(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
    requester: AuthenticatedUser,
    patch: web::Json<ListUpdate>,
) -> Result<impl Responder, AppError> {
    let list = services::lists::update_list(&pool, requester.id, &id, patch.into_inner()).await?;
    Ok(response::ok("List updated successfully", list))
}

#[delete("/{id}")]
pub async fn delete_list(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
    requester: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    services::lists::delete_list(&pool, requester.id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
