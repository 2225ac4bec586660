//! Repository for the `sessions` table.

use sqlx::PgPool;

use crate::models::session::{CreateSession, SessionRecord};
use crate::types::DbId;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token_hash, user_id, expires_at, created_at, updated_at";

/// Provides CRUD operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSession,
    ) -> Result<SessionRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (token_hash, user_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionRecord>(&query)
            .bind(&input.token_hash)
            .bind(input.user_id)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a live session by its token hash.
    ///
    /// Expired sessions are never returned; the client's stale cookie is
    /// simply treated as no session.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE token_hash = $1
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, SessionRecord>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Attach (or detach) the authenticated user on an existing session.
    ///
    /// Returns `true` if the row was updated.
    pub async fn set_user(
        pool: &PgPool,
        id: DbId,
        user_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE sessions SET user_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired sessions. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
