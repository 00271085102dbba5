use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A user row as stored in the database. Never serialized directly:
/// the password hash must not leave the server, so responses go through
/// [`UserPublic`].
#[derive(Debug, FromRow)]
pub struct User {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The client-visible view of a user.
///
/// `created_at` is optional because the login response omits it while
/// registration and profile include it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Full public view: id, name, email, and creation timestamp.
    pub fn public_view(&self) -> UserPublic {
        UserPublic {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: Some(self.created_at),
        }
    }

    /// The reduced view returned on login.
    pub fn login_view(&self) -> UserPublic {
        UserPublic {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: None,
        }
    }
}
