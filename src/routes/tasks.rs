use crate::{
    auth::AuthUser,
    error::ApiError,
    models::{CreateTaskRequest, Task, TaskWithCategory, UpdateTaskRequest},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

const TASK_COLUMNS: &str =
    "task_id, user_id, category_id, title, description, status, due_date, created_at, updated_at";

/// Retrieves all tasks for the authenticated user, newest first.
///
/// Each task is augmented with the name of its category (`category_name`,
/// NULL when unassigned) via a LEFT JOIN.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    auth: AuthUser,
) -> Result<impl Responder, ApiError> {
    let tasks = sqlx::query_as::<_, TaskWithCategory>(
        "SELECT t.task_id, t.user_id, t.category_id, t.title, t.description, t.status, \
                t.due_date, t.created_at, t.updated_at, c.name AS category_name \
         FROM tasks t \
         LEFT JOIN categories c ON t.category_id = c.category_id \
         WHERE t.user_id = $1 \
         ORDER BY t.created_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": tasks.len(),
        "tasks": tasks
    })))
}

/// Retrieves a single task by id, augmented with its category name.
///
/// A task owned by another user is reported exactly like a missing one.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let task = sqlx::query_as::<_, TaskWithCategory>(
        "SELECT t.task_id, t.user_id, t.category_id, t.title, t.description, t.status, \
                t.due_date, t.created_at, t.updated_at, c.name AS category_name \
         FROM tasks t \
         LEFT JOIN categories c ON t.category_id = c.category_id \
         WHERE t.task_id = $1 AND t.user_id = $2",
    )
    .bind(task_id.into_inner())
    .bind(auth.user_id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "task": task
    })))
}

/// Creates a new task for the authenticated user.
///
/// Status defaults to Pending; description, due date, and category are NULL
/// when omitted. A supplied category_id is not checked against the caller's
/// categories.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, ApiError> {
    // Validate input before any store access
    task_data.validate()?;

    let status = task_data.status.unwrap_or_default();

    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (user_id, title, description, status, due_date, category_id) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(auth.user_id)
    .bind(task_data.title.trim())
    .bind(&task_data.description)
    .bind(status)
    .bind(task_data.due_date)
    .bind(task_data.category_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Task created successfully",
        "task": task
    })))
}

/// Partially updates a task owned by the authenticated user.
///
/// Every field omitted from the request keeps its stored value (COALESCE per
/// field). `updated_at` is refreshed on every successful update regardless of
/// which fields changed.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    task_id: web::Path<i32>,
    task_data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, ApiError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();

    // First, verify the task exists and belongs to the caller
    let existing = sqlx::query_as::<_, (i32,)>(
        "SELECT task_id FROM tasks WHERE task_id = $1 AND user_id = $2",
    )
    .bind(task_id)
    .bind(auth.user_id)
    .fetch_optional(&**pool)
    .await?;

    if existing.is_none() {
        return Err(ApiError::NotFound("Task not found".into()));
    }

    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET title = COALESCE($1, title), \
             description = COALESCE($2, description), \
             status = COALESCE($3, status), \
             due_date = COALESCE($4, due_date), \
             category_id = COALESCE($5, category_id), \
             updated_at = now() \
         WHERE task_id = $6 AND user_id = $7 \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task_data.title.as_deref().map(str::trim))
    .bind(&task_data.description)
    .bind(task_data.status)
    .bind(task_data.due_date)
    .bind(task_data.category_id)
    .bind(task_id)
    .bind(auth.user_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task updated successfully",
        "task": task
    })))
}

/// Deletes a task owned by the authenticated user.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    auth: AuthUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1 AND user_id = $2")
        .bind(task_id.into_inner())
        .bind(auth.user_id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task deleted successfully"
    })))
}
