//! User lifecycle and directory endpoints.
//!
//! Registration, login, activation and password recovery are public; the
//! lookup endpoints require a session and only ever return the requester's
//! own record.

use crate::{
    auth::{
        AuthResponse, AuthenticatedUser, LoginRequest, RecoverPasswordRequest, RegisterRequest,
        TokenService,
    },
    config::Config,
    error::AppError,
    mailer::EmailSender,
    models::{User, UserQuery},
    response, services,
};
use actix_web::{get, post, web, Responder};
use sqlx::PgPool;

/// Register a new user
///
/// Creates a pending account, emails the activation link and returns a
/// session token alongside the user.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    mailer: web::Data<EmailSender>,
    tokens: web::Data<TokenService>,
    config: web::Data<Config>,
    data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let (user, token) = services::users::register(
        &pool,
        &mailer,
        &tokens,
        &config.public_url,
        data.into_inner(),
    )
    .await?;

    Ok(response::created(
        "User registered successfully",
        AuthResponse { token, user },
    ))
}

/// Activate a pending account via the emailed token.
#[get("/activate-account/{token}")]
pub async fn activate_account(
    pool: web::Data<PgPool>,
    token: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = services::users::activate_account(&pool, &token).await?;
    Ok(response::ok("User activated successfully", user))
}

/// Login user
///
/// Authenticates an activated account and returns a session token.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let (user, token) = services::users::login(&pool, &tokens, data.into_inner()).await?;
    Ok(response::ok(
        "User logged in successfully",
        AuthResponse { token, user },
    ))
}

/// Issue a password-reset token and email it to the account holder.
#[post("/send-recover-password-token/{email}")]
pub async fn send_recover_password_token(
    pool: web::Data<PgPool>,
    mailer: web::Data<EmailSender>,
    email: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let token = services::users::send_recover_password_token(&pool, &mailer, &email).await?;
    Ok(response::ok("Password recovery email sent", token))
}

/// Consume a reset token and set a new password.
#[post("/recover-password")]
pub async fn recover_password(
    pool: web::Data<PgPool>,
    data: web::Json<RecoverPasswordRequest>,
) -> Result<impl Responder, AppError> {
    let user = services::users::recover_password(&pool, data.into_inner()).await?;
    Ok(response::ok("Password updated successfully", user))
}

/// A user may only read their own record through the lookup endpoints.
fn own_record(user: Option<User>, requester: &AuthenticatedUser) -> Result<User, AppError> {
    let user = user.ok_or_else(|| AppError::NotFound("User not found".into()))?;
    if user.id != requester.id {
        return Err(AppError::Unauthorized(
            "You can only access your own user information".into(),
        ));
    }
    Ok(user)
}

#[get("/{id}")]
pub async fn get_user_by_id(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
    requester: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = services::users::get_user_by_id(&pool, &id).await?;
    Ok(response::ok("User found", own_record(user, &requester)?))
}

#[get("/username/{username}")]
pub async fn get_user_by_username(
    pool: web::Data<PgPool>,
    username: web::Path<String>,
    requester: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = services::users::get_user_by_username(&pool, &username).await?;
    Ok(response::ok("User found", own_record(user, &requester)?))
}

#[get("/email/{email}")]
pub async fn get_user_by_email(
    pool: web::Data<PgPool>,
    email: web::Path<String>,
    requester: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = services::users::get_user_by_email(&pool, &email).await?;
    Ok(response::ok("User found", own_record(user, &requester)?))
}

/// Paged, searchable user directory.
#[get("")]
pub async fn get_all_users(
    pool: web::Data<PgPool>,
    query: web::Query<UserQuery>,
) -> Result<impl Responder, AppError> {
    let users = services::users::get_all_users(&pool, query.into_inner()).await?;
    Ok(response::ok("Users found", users))
}
