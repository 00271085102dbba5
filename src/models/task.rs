use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
///
/// Transitions are unrestricted: any status may move to any other via update.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Task is yet to be started. Initial status unless specified.
    #[default]
    Pending,
    /// Task is currently being worked on.
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    /// Task is done.
    Completed,
}

/// A task row as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub task_id: i32,
    /// The owning user. Every query filters on this.
    pub user_id: i32,
    /// Nullable category reference; NULL means unassigned.
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update, whether or not any field changed.
    pub updated_at: DateTime<Utc>,
}

/// A task joined with the name of its category, as returned by list and get.
/// `category_name` is NULL when the task is unassigned.
#[derive(Debug, Serialize, FromRow)]
pub struct TaskWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub category_name: Option<String>,
}

/// Input payload for creating a task. Everything but the title is optional;
/// status defaults to Pending, the rest default to NULL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(custom(function = "crate::models::not_blank", message = "Title is required"))]
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
}

/// Input payload for a partial task update.
///
/// Any field omitted from the request keeps its stored value; there is no way
/// to clear a field back to NULL through this endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(custom(function = "crate::models::not_blank", message = "Title cannot be empty"))]
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
}
