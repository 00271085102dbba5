use crate::{
    auth::{hash_password, verify_password, AuthUser, JwtKeys, LoginRequest, RegisterRequest},
    error::ApiError,
    models::User,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns an authentication token together
/// with the public view of the user. The password is stored only as a bcrypt
/// hash and never echoed back.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, ApiError> {
    // Validate input before any store access
    register_data.validate()?;

    // Check if email already exists. This check-then-insert is not atomic;
    // the unique constraint on email is the authoritative guard, and its
    // violation maps to the same DuplicateEmail error (see error.rs).
    let existing_user = sqlx::query_as::<_, (i32,)>("SELECT user_id FROM users WHERE email = $1")
        .bind(&register_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    // Hash password
    let password_hash = hash_password(&register_data.password)?;

    // Insert new user
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
         RETURNING user_id, name, email, password_hash, created_at",
    )
    .bind(register_data.name.trim())
    .bind(&register_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    // Generate token
    let token = keys.generate_token(user.user_id, &user.email)?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "User registered successfully",
        "token": token,
        "user": user.public_view()
    })))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. An unknown email
/// and a wrong password produce byte-identical responses so that accounts
/// cannot be enumerated.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, ApiError> {
    // Validate input
    login_data.validate()?;

    // Get user from database
    let user = sqlx::query_as::<_, User>(
        "SELECT user_id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(&login_data.email)
    .fetch_optional(&**pool)
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    // Generate token
    let token = keys.generate_token(user.user_id, &user.email)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Login successful",
        "token": token,
        "user": user.login_view()
    })))
}

/// Get the profile of the authenticated user.
///
/// Returns 404 if the user row no longer exists, e.g. the account was deleted
/// after the token was issued.
#[get("/profile")]
pub async fn profile(
    pool: web::Data<PgPool>,
    auth: AuthUser,
) -> Result<impl Responder, ApiError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT user_id, name, email, password_hash, created_at FROM users WHERE user_id = $1",
    )
    .bind(auth.user_id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": user.public_view()
    })))
}
