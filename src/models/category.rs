use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A category row as stored and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub category_id: i32,
    /// The owning user. Every query filters on this.
    pub user_id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input payload for creating or renaming a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(custom(
        function = "crate::models::not_blank",
        message = "Category name is required"
    ))]
    #[validate(length(max = 100, message = "Category name must be at most 100 characters"))]
    pub name: String,
}

impl CategoryInput {
    /// The name as stored: surrounding whitespace stripped.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}
