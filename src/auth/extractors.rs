use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::ApiError;

/// The resolved caller identity, extracted from request extensions.
///
/// Intended for routes protected by `AuthMiddleware`, which validates the JWT
/// and stores the decoded [`Claims`] in the request extensions. Every resource
/// handler scopes its store operations by `user_id`, so a missing identity here
/// means the middleware did not run and the request must be rejected.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

impl FromRequest for AuthUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthUser {
                user_id: claims.sub,
                email: claims.email.clone(),
            })),
            None => {
                let err = ApiError::Unauthorized(
                    "Missing identity. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
