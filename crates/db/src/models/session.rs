//! Session entity model and DTOs.

use sqlx::FromRow;

use crate::types::{DbId, Timestamp};

/// A session row from the `sessions` table.
///
/// `token_hash` is the SHA-256 hex digest of the opaque token the client
/// holds in its cookie; the plaintext token is never stored. `user_id` is
/// NULL until the session's owner authenticates.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub id: DbId,
    pub token_hash: String,
    pub user_id: Option<DbId>,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub token_hash: String,
    pub user_id: Option<DbId>,
    pub expires_at: Timestamp,
}
