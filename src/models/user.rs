use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role of a user account.
/// Corresponds to the `user_role` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular account; may only act on entities it owns.
    User,
    /// May additionally list all ToDos across owners.
    Admin,
}

/// Represents a user account as stored in the database.
///
/// Credential and lifecycle-token fields are never serialized into responses.
/// The user's owned lists are the `lists` rows whose `user_id` matches
/// [`User::id`]; there is no materialized reference set on the user itself.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// False until a valid, unexpired activation token is presented.
    pub is_activated: bool,
    #[serde(skip_serializing, default)]
    pub activation_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub activation_expires: Option<DateTime<Utc>>,
    /// Present only while a password reset is pending; always paired with
    /// `reset_expires`.
    #[serde(skip_serializing, default)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_expires: Option<DateTime<Utc>>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for the paged user directory.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    /// 1-based page number; defaults to 1.
    pub page: Option<i64>,
    /// Page size; defaults to 10.
    pub limit: Option<i64>,
    /// Sort column; one of `created_at`, `username`, `email`.
    pub sort: Option<String>,
    /// `asc` or `desc`; defaults to `desc`.
    pub order: Option<String>,
    /// Case-insensitive substring match over username OR email.
    pub search: Option<String>,
}
