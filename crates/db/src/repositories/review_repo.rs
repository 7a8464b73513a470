//! Repository for the `reviews` table.

use bookreview_core::search::contains_pattern;
use bookreview_core::types::DbId;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::models::review::{
    CreateReview, RatingSummary, Review, ReviewAdminFilter, ReviewDetail, UpdateReview,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, book_id, user_id, rating, review_text, created_at, updated_at";

/// Joined column list for [`ReviewDetail`]; expects `reviews r`, `books b`, `users u`.
const DETAIL_COLUMNS: &str = "r.id, r.book_id, b.title AS book_title, r.user_id, u.username, \
                              r.rating, r.review_text, r.created_at, r.updated_at";

const DETAIL_FROM: &str = "FROM reviews r \
                           JOIN books b ON b.id = r.book_id \
                           JOIN users u ON u.id = r.user_id";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a new review, returning the created row.
    ///
    /// A second review for the same (book, user) pair fails with a unique
    /// violation on `uq_reviews_book_user`.
    pub async fn create(pool: &SqlitePool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO reviews (book_id, user_id, rating, review_text, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.book_id)
            .bind(input.user_id)
            .bind(input.rating)
            .bind(&input.review_text)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a review with its book title and reviewer name.
    pub async fn find_detail(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<ReviewDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE r.id = ?");
        sqlx::query_as::<_, ReviewDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All reviews of a book, newest first.
    pub async fn list_for_book(
        pool: &SqlitePool,
        book_id: DbId,
    ) -> Result<Vec<ReviewDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             WHERE r.book_id = ?
             ORDER BY r.created_at DESC, r.id DESC"
        );
        sqlx::query_as::<_, ReviewDetail>(&query)
            .bind(book_id)
            .fetch_all(pool)
            .await
    }

    /// The review `user_id` wrote for `book_id`, if any.
    pub async fn find_for_book_and_user(
        pool: &SqlitePool,
        book_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE book_id = ? AND user_id = ?");
        sqlx::query_as::<_, Review>(&query)
            .bind(book_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `user_id` has already reviewed `book_id`.
    pub async fn exists_for_book_and_user(
        pool: &SqlitePool,
        book_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (i64,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE book_id = ? AND user_id = ?)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists != 0)
    }

    /// Review count and mean rating for a book.
    pub async fn rating_summary(
        pool: &SqlitePool,
        book_id: DbId,
    ) -> Result<RatingSummary, sqlx::Error> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT COUNT(*) AS review_count, AVG(rating) AS average_rating
             FROM reviews WHERE book_id = ?",
        )
        .bind(book_id)
        .fetch_one(pool)
        .await
    }

    /// Count all reviews.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Count reviews of a book.
    pub async fn count_for_book(pool: &SqlitePool, book_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Change a review's rating and text.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET rating = ?, review_text = ?, updated_at = ?
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.rating)
            .bind(&input.review_text)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Admin changelist: apply the sidebar filters and search box.
    ///
    /// Date filters are evaluated relative to `today`. Newest first.
    pub async fn admin_list(
        pool: &SqlitePool,
        filter: &ReviewAdminFilter,
        today: NaiveDate,
    ) -> Result<Vec<ReviewDetail>, sqlx::Error> {
        // Build dynamic WHERE clauses.
        let mut conditions = Vec::new();

        if filter.rating.is_some() {
            conditions.push("r.rating = ?");
        }
        if filter.user_id.is_some() {
            conditions.push("r.user_id = ?");
        }
        let created = filter.created.range(today);
        if created.is_some() {
            conditions.push("date(r.created_at) >= ? AND date(r.created_at) < ?");
        }
        let pattern = filter.search.as_deref().map(contains_pattern);
        if pattern.is_some() {
            conditions.push(
                "(b.title_folded LIKE ? ESCAPE '\\' OR u.username_folded LIKE ? ESCAPE '\\')",
            );
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} {where_clause}
             ORDER BY r.created_at DESC, r.id DESC"
        );
        let mut q = sqlx::query_as::<_, ReviewDetail>(&query);

        // Bind dynamic parameters in order.
        if let Some(rating) = filter.rating {
            q = q.bind(rating);
        }
        if let Some(user_id) = filter.user_id {
            q = q.bind(user_id);
        }
        if let Some((start, end)) = created {
            q = q.bind(start).bind(end);
        }
        if let Some(ref pattern) = pattern {
            q = q.bind(pattern).bind(pattern);
        }

        q.fetch_all(pool).await
    }
}
