//! User lifecycle: registration, activation, login, password recovery, and
//! directory lookups.
//!
//! State machine per user: pending until a valid activation token is
//! presented, then activated; a pending account whose token has expired is
//! deleted lazily on its next login attempt. Activated accounts can hold at
//! most one pending reset token at a time, both fields set and cleared
//! together.

use crate::auth::{
    hash_password, random_hex_token, verify_password, LoginRequest, RecoverPasswordRequest,
    RegisterRequest, TokenService,
};
use crate::error::AppError;
use crate::mailer::EmailSender;
use crate::models::{User, UserQuery};
use crate::security::{sanitize_input, validate_sql_input};
use crate::services::parse_id;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Activation and reset tokens are valid for one hour.
const LIFECYCLE_TOKEN_TTL: i64 = 3600;

/// Entropy of the account-activation token, in bytes (hex-encoded on the wire).
const ACTIVATION_TOKEN_BYTES: usize = 35;
/// Entropy of the password-reset token, in bytes.
const RESET_TOKEN_BYTES: usize = 15;

/// Registers a new user in the pending state and issues a session token.
///
/// The session token is valid before activation — login, not registration, is
/// gated on the activation flag. If the email is already taken by an activated
/// account the call fails; a stale unactivated record for the same email is
/// replaced, so an abandoned signup can simply register again. The activation
/// email is fire-and-forget: delivery failure never fails registration.
pub async fn register(
    pool: &PgPool,
    mailer: &EmailSender,
    tokens: &TokenService,
    public_url: &str,
    data: RegisterRequest,
) -> Result<(User, String), AppError> {
    data.validate()?;

    if data.password != data.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".into()));
    }

    let existing = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&data.email)
        .fetch_optional(pool)
        .await?;

    if let Some(existing) = existing {
        if existing.is_activated {
            return Err(AppError::BadRequest("Email already exists".into()));
        }
        // Abandoned signup: drop the stale pending record and register afresh.
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(existing.id)
            .execute(pool)
            .await?;
    }

    let activation_token = random_hex_token(ACTIVATION_TOKEN_BYTES);
    let activation_expires = Utc::now() + Duration::seconds(LIFECYCLE_TOKEN_TTL);
    let password_hash = hash_password(&data.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, email, password_hash, activation_token, activation_expires) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&data.username)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(&activation_token)
    .bind(activation_expires)
    .fetch_one(pool)
    .await?;

    let session_token = tokens.issue(&user)?;

    let activation_url = format!(
        "{}/api/user/activate-account/{}",
        public_url, activation_token
    );
    mailer.send_detached(EmailSender::activation_email(
        &user.username,
        &user.email,
        &activation_url,
    ));

    Ok((user, session_token))
}

/// Activates the account holding a matching, unexpired activation token and
/// clears the token pair.
pub async fn activate_account(pool: &PgPool, token: &str) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET is_activated = TRUE, activation_token = NULL, activation_expires = NULL \
         WHERE activation_token = $1 AND activation_expires > NOW() RETURNING *",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        AppError::NotFound("Account activation token is invalid or has expired".into())
    })?;

    Ok(user)
}

/// Authenticates by email and password and issues a session token.
///
/// An unactivated account whose activation window has lapsed is deleted here,
/// lazily, and reported with the same message as a missing account so the two
/// cases are indistinguishable to the caller. An unactivated account within
/// the window gets a distinct "not activated" failure.
pub async fn login(
    pool: &PgPool,
    tokens: &TokenService,
    data: LoginRequest,
) -> Result<(User, String), AppError> {
    data.validate()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&data.email)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::BadRequest("User not found".into()))?;

    if !user.is_activated {
        let expired = user
            .activation_expires
            .map(|expires| expires < Utc::now())
            .unwrap_or(true);

        if expired {
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user.id)
                .execute(pool)
                .await?;
            return Err(AppError::BadRequest("User not found".into()));
        }

        return Err(AppError::BadRequest(
            "Account is not activated, please check your email".into(),
        ));
    }

    if !verify_password(&data.password, &user.password_hash)? {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let session_token = tokens.issue(&user)?;
    Ok((user, session_token))
}

/// Issues a password-reset token for the account behind `email` and sends it
/// out-of-band. Best-effort delivery; the token is also returned to the
/// caller.
pub async fn send_recover_password_token(
    pool: &PgPool,
    mailer: &EmailSender,
    email: &str,
) -> Result<String, AppError> {
    let token = random_hex_token(RESET_TOKEN_BYTES);
    let expires = Utc::now() + Duration::seconds(LIFECYCLE_TOKEN_TTL);

    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET reset_token = $1, reset_expires = $2 WHERE email = $3 RETURNING *",
    )
    .bind(&token)
    .bind(expires)
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    mailer.send_detached(EmailSender::recovery_email(&user.username, &user.email, &token));

    Ok(token)
}

/// Consumes a reset token: replaces the password and clears both reset fields.
pub async fn recover_password(
    pool: &PgPool,
    data: RecoverPasswordRequest,
) -> Result<User, AppError> {
    data.validate()?;

    if data.password != data.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".into()));
    }

    let password_hash = hash_password(&data.password)?;

    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET password_hash = $1, reset_token = NULL, reset_expires = NULL \
         WHERE reset_token = $2 AND reset_expires > NOW() RETURNING *",
    )
    .bind(&password_hash)
    .bind(&data.token)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        AppError::BadRequest("Password reset token is invalid or has expired".into())
    })?;

    Ok(user)
}

/// Plain lookup by id. No authorization here; callers decide what the
/// requester may see.
pub async fn get_user_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, AppError> {
    let user_id = parse_id(id)?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn get_user_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Maps the requested sort column onto the whitelisted set.
fn sort_column(sort: Option<&str>) -> Result<&'static str, AppError> {
    match sort.unwrap_or("created_at") {
        "created_at" => Ok("created_at"),
        "username" => Ok("username"),
        "email" => Ok("email"),
        other => Err(AppError::BadRequest(format!("Cannot sort by '{}'", other))),
    }
}

fn order_keyword(order: Option<&str>) -> Result<&'static str, AppError> {
    match order.unwrap_or("desc") {
        "asc" => Ok("ASC"),
        "desc" => Ok("DESC"),
        other => Err(AppError::BadRequest(format!("Invalid sort order '{}'", other))),
    }
}

/// Normalizes pagination to a (limit, offset) window: 1-based pages,
/// `skip = (page - 1) * limit`.
fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).clamp(1, 100);
    (limit, (page - 1) * limit)
}

/// Paged user directory with optional case-insensitive substring search over
/// username OR email.
pub async fn get_all_users(pool: &PgPool, query: UserQuery) -> Result<Vec<User>, AppError> {
    let sort = sort_column(query.sort.as_deref())?;
    let order = order_keyword(query.order.as_deref())?;
    let (limit, offset) = page_window(query.page, query.limit);

    let search = match query.search.as_deref().filter(|s| !s.is_empty()) {
        Some(search) => {
            if validate_sql_input(search).is_err() {
                return Err(AppError::BadRequest("Invalid search query".into()));
            }
            Some(sanitize_input(search))
        }
        None => None,
    };

    // Sort column and order come from the whitelists above; the search term is
    // always bound, never interpolated.
    let users = if let Some(search) = search {
        sqlx::query_as::<_, User>(&format!(
            "SELECT * FROM users WHERE username ILIKE $1 OR email ILIKE $1 \
             ORDER BY {} {} LIMIT $2 OFFSET $3",
            sort, order
        ))
        .bind(format!("%{}%", search))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, User>(&format!(
            "SELECT * FROM users ORDER BY {} {} LIMIT $1 OFFSET $2",
            sort, order
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?
    };

    Ok(users)
}
