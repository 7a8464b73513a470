//! Repository for the `user_sessions` table.

use bookreview_core::types::DbId;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::session::{CreateSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_hash, expires_at, is_revoked, \
                       user_agent, created_at, updated_at";

/// Provides CRUD operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateSession,
    ) -> Result<UserSession, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO user_sessions (user_id, token_hash, expires_at, user_agent, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find an active session by its token hash.
    ///
    /// Only returns sessions that are not revoked and not expired.
    pub async fn find_active_by_token_hash(
        pool: &SqlitePool,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE token_hash = ?
               AND is_revoked = 0
               AND expires_at > ?"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Revoke the session with the given token hash. Returns `true` if a row was updated.
    pub async fn revoke_by_token_hash(pool: &SqlitePool, hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = 1, updated_at = ?
             WHERE token_hash = ? AND is_revoked = 0",
        )
        .bind(Utc::now())
        .bind(hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired or revoked sessions. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_sessions WHERE expires_at < ? OR is_revoked = 1")
                .bind(Utc::now())
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
