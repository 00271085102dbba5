use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::JwtKeys;
use crate::error::ApiError;

/// Bearer-token guard applied to the `/api` scope.
///
/// Every request except registration and login must carry a valid
/// `Authorization: Bearer <token>` header. On success the decoded [`Claims`]
/// are attached to the request extensions for the [`AuthUser`] extractor;
/// on failure the request is rejected with a 401 before reaching any handler.
///
/// [`Claims`]: crate::auth::token::Claims
/// [`AuthUser`]: crate::auth::extractors::AuthUser
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Registration and login are the only unauthenticated endpoints under /api.
        let path = req.path();
        if path.starts_with("/api/auth/login") || path.starts_with("/api/auth/register") {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        // The signing material is injected as app data at startup.
        let keys = match req.app_data::<web::Data<JwtKeys>>() {
            Some(keys) => keys.clone(),
            None => {
                let err = ApiError::Internal("JWT keys not configured".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match auth_header {
            Some(token) => match keys.verify_token(token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
            },
            None => {
                let app_err = ApiError::Unauthorized("Missing token".into());
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
