//! Process configuration, loaded once at startup.
//!
//! Required variables fail fast with [`AppError::InvalidEnv`]; optional ones
//! carry development defaults. The JWT secret falls back to a built-in
//! constant with a loud one-time warning, matching the behaviour production
//! deployments are expected to override.

use crate::error::AppError;
use std::env;

/// Development-only signing secret, used when `JWT_SECRET` is unset.
const FALLBACK_JWT_SECRET: &str = "default_test_secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// HS256 signing secret for session tokens.
    pub jwt_secret: String,
    /// Public base URL, used to build account-activation links.
    pub public_url: String,
    /// API key for the outbound email transport.
    pub resend_api_key: String,
    /// Sender address for outbound email.
    pub mail_from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::InvalidEnv("DATABASE_URL must be set".into()))?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| AppError::InvalidEnv("SERVER_PORT must be a number".into()))?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                log::warn!(
                    "JWT_SECRET is not set; using the default development secret. \
                     Set a unique secret in production."
                );
                FALLBACK_JWT_SECRET.to_string()
            }
        };

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

        let resend_api_key = env::var("RESEND_API_KEY")
            .map_err(|_| AppError::InvalidEnv("RESEND_API_KEY must be set".into()))?;
        let mail_from = env::var("MAIL_FROM")
            .map_err(|_| AppError::InvalidEnv("MAIL_FROM must be set".into()))?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            jwt_secret,
            public_url,
            resend_api_key,
            mail_from,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("RESEND_API_KEY", "re_test_key");
        env::set_var("MAIL_FROM", "Listkeeper <no-reply@example.com>");
        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("JWT_SECRET");
        env::remove_var("PUBLIC_URL");

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.jwt_secret, FALLBACK_JWT_SECRET);
        assert_eq!(config.public_url, "http://127.0.0.1:8080");
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");

        // Custom values win over defaults.
        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("JWT_SECRET", "configured-secret");
        env::set_var("PUBLIC_URL", "https://lists.example.com");

        let config = Config::from_env().unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.jwt_secret, "configured-secret");
        assert_eq!(config.public_url, "https://lists.example.com");

        // Missing required configuration fails fast.
        env::remove_var("DATABASE_URL");
        match Config::from_env() {
            Err(AppError::InvalidEnv(msg)) => assert!(msg.contains("DATABASE_URL")),
            other => panic!("Expected InvalidEnv, got {:?}", other),
        }
        env::set_var("DATABASE_URL", "postgres://test");
    }
}
