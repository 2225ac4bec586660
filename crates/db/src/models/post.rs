//! Post entity model and DTOs.

use sqlx::FromRow;

use crate::types::{DbId, Timestamp};

/// A post row from the `posts` table.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: DbId,
    pub title: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new post.
#[derive(Debug)]
pub struct CreatePost {
    pub title: String,
}
