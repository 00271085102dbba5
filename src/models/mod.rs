pub mod category;
pub mod task;
pub mod user;

pub use category::{Category, CategoryInput};
pub use task::{CreateTaskRequest, Task, TaskStatus, TaskWithCategory, UpdateTaskRequest};
pub use user::{User, UserPublic};

use validator::ValidationError;

/// Custom validator: rejects values that are empty after trimming whitespace.
/// Handlers store the trimmed form, so "  " is as invalid as "".
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}
