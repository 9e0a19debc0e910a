use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// Extracts the authenticated requester's identity from request extensions.
///
/// Intended for routes protected by `AuthMiddleware`, which validates the
/// session token and inserts the decoded `Claims`. If no claims are present
/// the request is rejected with `Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedUser {
                id: claims.sub,
                username: claims.username,
            })),
            None => {
                let err = AppError::Unauthorized(
                    "No authenticated user in request. Ensure AuthMiddleware is active.".into(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
