use crate::config::Config;
use crate::error::ApiError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a JWT (JSON Web Token).
///
/// `sub` and `email` together form the resolved caller identity used for
/// ownership scoping in every handler.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: i32,
    /// The user's email address at issuance time.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Process-wide JWT signing material, derived once from [`Config`] at startup
/// and shared with handlers and the auth middleware via `web::Data`.
///
/// The signing secret is never read from the environment after startup and is
/// never mutated.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: chrono::Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry: chrono::Duration::days(expiry_days),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiry_days)
    }

    /// Issues a signed, time-limited token for the given user.
    ///
    /// The token expires after the configured lifetime (7 days by default).
    pub fn generate_token(&self, user_id: i32, email: &str) -> Result<String, ApiError> {
        let now = chrono::Utc::now();
        let expiration = now
            .checked_add_signed(self.expiry)
            .ok_or_else(|| ApiError::Internal("Token expiry out of range".into()))?;

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token string and decodes its claims.
    ///
    /// Returns `ApiError::Unauthorized` if the token is malformed, its signature
    /// is invalid, or it has expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))
    }
}
