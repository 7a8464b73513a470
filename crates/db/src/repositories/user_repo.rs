//! Repository for the `users` table.

use bookreview_core::search::fold_case;
use bookreview_core::types::DbId;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::user::{CreateUser, User, UserRef};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, is_staff, is_active, \
                       last_login_at, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO users (username, username_folded, email, password_hash, is_staff,
                                created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(fold_case(&input.username))
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.is_staff)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username, ignoring case.
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username_folded = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(fold_case(username))
            .fetch_optional(pool)
            .await
    }

    /// Whether a username is taken, ignoring case.
    pub async fn username_taken(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
        let (taken,): (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username_folded = ?)")
                .bind(fold_case(username))
                .fetch_one(pool)
                .await?;
        Ok(taken != 0)
    }

    /// Count all users.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Users who have written at least one review, ordered by username.
    pub async fn list_reviewers(pool: &SqlitePool) -> Result<Vec<UserRef>, sqlx::Error> {
        sqlx::query_as::<_, UserRef>(
            "SELECT DISTINCT u.id, u.username
             FROM users u
             JOIN reviews r ON r.user_id = u.id
             ORDER BY u.username",
        )
        .fetch_all(pool)
        .await
    }

    /// Set `last_login_at` to now.
    pub async fn record_successful_login(pool: &SqlitePool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
