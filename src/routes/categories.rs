use crate::{
    auth::AuthUser,
    error::ApiError,
    models::{Category, CategoryInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Lists all categories owned by the authenticated user, ordered by name.
#[get("")]
pub async fn get_categories(
    pool: web::Data<PgPool>,
    auth: AuthUser,
) -> Result<impl Responder, ApiError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT category_id, user_id, name, created_at FROM categories \
         WHERE user_id = $1 ORDER BY name",
    )
    .bind(auth.user_id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": categories.len(),
        "categories": categories
    })))
}

/// Creates a new category for the authenticated user.
///
/// Duplicate names per user are blocked by a pre-insert existence check.
/// There is no store-level unique constraint on (user_id, name), so two
/// concurrent identical requests can both pass the check; that narrow race
/// is accepted.
#[post("")]
pub async fn create_category(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    category_data: web::Json<CategoryInput>,
) -> Result<impl Responder, ApiError> {
    category_data.validate()?;
    let name = category_data.trimmed_name();

    let existing = sqlx::query_as::<_, (i32,)>(
        "SELECT category_id FROM categories WHERE user_id = $1 AND name = $2",
    )
    .bind(auth.user_id)
    .bind(name)
    .fetch_optional(&**pool)
    .await?;

    if existing.is_some() {
        return Err(ApiError::DuplicateName);
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (user_id, name) VALUES ($1, $2) \
         RETURNING category_id, user_id, name, created_at",
    )
    .bind(auth.user_id)
    .bind(name)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Category created successfully",
        "category": category
    })))
}

/// Retrieves a single category by id.
///
/// A category owned by another user is reported exactly like a missing one.
#[get("/{id}")]
pub async fn get_category(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    category_id: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT category_id, user_id, name, created_at FROM categories \
         WHERE category_id = $1 AND user_id = $2",
    )
    .bind(category_id.into_inner())
    .bind(auth.user_id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "category": category
    })))
}

/// Renames a category owned by the authenticated user.
#[put("/{id}")]
pub async fn update_category(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    category_id: web::Path<i32>,
    category_data: web::Json<CategoryInput>,
) -> Result<impl Responder, ApiError> {
    category_data.validate()?;

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $1 WHERE category_id = $2 AND user_id = $3 \
         RETURNING category_id, user_id, name, created_at",
    )
    .bind(category_data.trimmed_name())
    .bind(category_id.into_inner())
    .bind(auth.user_id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Category updated successfully",
        "category": category
    })))
}

/// Deletes a category owned by the authenticated user.
///
/// Tasks that referenced the category keep all their fields but have their
/// category reference set to NULL by the store's ON DELETE SET NULL rule.
#[delete("/{id}")]
pub async fn delete_category(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    category_id: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let result = sqlx::query("DELETE FROM categories WHERE category_id = $1 AND user_id = $2")
        .bind(category_id.into_inner())
        .bind(auth.user_id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Category not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Category deleted successfully"
    })))
}
