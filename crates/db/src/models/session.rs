//! Browser session model and DTOs.

use bookreview_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `user_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
    /// SHA-256 hex digest of the session token id; the id itself is never stored.
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
}
