//! Shared setup for the integration tests. These tests run against a real
//! PostgreSQL instance: `DATABASE_URL` must be set (a `.env` file works) and
//! `db/schema.sql` must have been applied.

#![allow(dead_code)]

use actix_cors::Cors;
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App, Error};
use serde_json::{json, Value};
use sqlx::PgPool;

use tasktrack::auth::{AuthMiddleware, JwtKeys};
use tasktrack::error::{json_error_handler, path_error_handler};
use tasktrack::routes;

pub async fn connect_pool() -> PgPool {
    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB")
}

fn jwt_keys() -> web::Data<JwtKeys> {
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "integration-test-secret".into());
    web::Data::new(JwtKeys::new(&secret, 7))
}

/// Builds the full application exactly as `main.rs` wires it: CORS + Logger,
/// `/health` outside `/api`, and the `/api` scope behind `AuthMiddleware`.
pub async fn init_app(
    pool: &PgPool,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(jwt_keys())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

/// Deletes a user by email; categories and tasks follow via ON DELETE CASCADE.
pub async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

/// Registers a user through the API and returns (token, user id).
pub async fn register_user<S, B>(app: &S, name: &str, email: &str, password: &str) -> (String, i64)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        StatusCode::CREATED,
        "registration failed for {}",
        email
    );

    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token missing").to_string();
    let user_id = body["user"]["id"].as_i64().expect("user id missing");
    (token, user_id)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
