//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `ApiError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! various error conditions, from authentication failures to database issues.
//!
//! `ApiError` implements `actix_web::error::ResponseError` to convert application errors
//! into the JSON envelope every endpoint uses: a `success` boolean plus either a
//! `message` string or an `errors` array of per-field validation failures.
//! `From` trait implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow handlers to use `?`.

use actix_web::{error::ResponseError, HttpRequest, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum ApiError {
    /// Input failed field validation (HTTP 400). Carries the per-field failures.
    Validation(ValidationErrors),
    /// A malformed or otherwise invalid request (HTTP 400).
    BadRequest(String),
    /// Registration attempted with an email that is already taken (HTTP 400).
    DuplicateEmail,
    /// The caller already owns a category with the requested name (HTTP 400).
    DuplicateName,
    /// Missing, malformed, or expired bearer token (HTTP 401).
    Unauthorized(String),
    /// Login failure. Deliberately carries no detail so that an unknown email and a
    /// wrong password are indistinguishable to the client (HTTP 401).
    InvalidCredentials,
    /// The resource does not exist or is owned by another user (HTTP 404).
    NotFound(String),
    /// Unexpected store or internal failure (HTTP 500). The detail is logged
    /// server-side; the client only ever sees a generic message.
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::DuplicateEmail => write!(f, "User already exists with this email"),
            ApiError::DuplicateName => write!(f, "Category with this name already exists"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Flattens `validator::ValidationErrors` into the `errors` array the API returns:
/// one `{field, message}` object per failed rule.
fn validation_errors_json(errors: &ValidationErrors) -> serde_json::Value {
    let list: Vec<serde_json::Value> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            let field = *field;
            field_errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                json!({ "field": field, "message": message })
            })
        })
        .collect();
    json!(list)
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) => HttpResponse::BadRequest().json(json!({
                "success": false,
                "errors": validation_errors_json(errors)
            })),
            ApiError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": msg
            })),
            ApiError::DuplicateEmail => HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "User already exists with this email"
            })),
            ApiError::DuplicateName => HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "Category with this name already exists"
            })),
            ApiError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "success": false,
                "message": msg
            })),
            ApiError::InvalidCredentials => HttpResponse::Unauthorized().json(json!({
                "success": false,
                "message": "Invalid credentials"
            })),
            ApiError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "success": false,
                "message": msg
            })),
            ApiError::Internal(msg) => {
                // The detail stays in the server log; clients get a generic message.
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "success": false,
                    "message": "Server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `ApiError`.
///
/// A unique-constraint violation on the users email column is mapped to
/// `DuplicateEmail`, so a concurrent registration that slips past the pre-insert
/// existence check still surfaces as the same client error rather than a 500.
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        if let sqlx::Error::Database(ref db_err) = error {
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("users_email_key")
            {
                return ApiError::DuplicateEmail;
            }
        }
        match error {
            sqlx::Error::RowNotFound => ApiError::NotFound("Record not found".into()),
            _ => ApiError::Internal(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> ApiError {
        ApiError::Validation(errors)
    }
}

/// JWT processing failures (bad signature, malformed token, expiry) are 401s.
impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(error: jsonwebtoken::errors::Error) -> ApiError {
        ApiError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(error: bcrypt::BcryptError) -> ApiError {
        ApiError::Internal(format!("Password hashing failed: {}", error))
    }
}

/// Keeps JSON body deserialization failures (missing fields, wrong types, unknown
/// enum labels) inside the `{success: false}` envelope instead of actix's plain-text
/// 400. Registered via `web::JsonConfig` on the app.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid request body: {}", err)).into()
}

/// Same treatment for non-integer `:id` path segments, via `web::PathConfig`.
pub fn path_error_handler(
    _err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError::BadRequest("Invalid ID - must be a positive integer".into()).into()
}
