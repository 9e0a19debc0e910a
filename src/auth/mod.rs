pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Generates a random lowercase-hex token of `n_bytes` entropy.
///
/// Used for the one-time account-activation and password-reset tokens, which
/// are independent of session tokens.
pub fn random_hex_token(n_bytes: usize) -> String {
    let mut bytes = vec![0u8; n_bytes];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email)]
    pub email: String,
    /// User's password. Must not be empty; no length policy beyond that.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username for the new account.
    /// Must be between 3 and 32 characters, alphanumeric, underscores or hyphens.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    /// Email address for the new account.
    #[validate(email)]
    pub email: String,
    /// Password for the new account. Must not be empty.
    #[validate(length(min = 1))]
    pub password: String,
    /// Must match `password` exactly.
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Represents the payload for consuming a password-reset token.
#[derive(Debug, Deserialize, Validate)]
pub struct RecoverPasswordRequest {
    /// The reset token previously issued by `send-recover-password-token`.
    #[validate(length(min = 1))]
    pub token: String,
    /// The replacement password. Must not be empty.
    #[validate(length(min = 1))]
    pub password: String,
    /// Must match `password` exactly.
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Response payload after successful authentication (login or registration).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The session JWT.
    pub token: String,
    /// The authenticated user.
    pub user: crate::models::User,
}
