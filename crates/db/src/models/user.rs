//! User entity model and DTOs.

use sqlx::FromRow;

use crate::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER expose this through the API.
/// The transport-facing shape lives in the API crate.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    /// Argon2id PHC string, hashed by the caller. Plaintext never reaches
    /// this layer.
    pub password_hash: String,
}
