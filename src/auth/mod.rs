pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::Deserialize;
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, JwtKeys};

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account. Must be non-blank after trimming.
    #[validate(custom(function = "crate::models::not_blank", message = "Name is required"))]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,
    /// Email address for the new account. Must be a valid email format.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    /// Password for the new account. Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
