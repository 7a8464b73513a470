//! Review entity model and DTOs.

use bookreview_core::date_filter::DateFilter;
use bookreview_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A review row from the `reviews` table.
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: DbId,
    pub book_id: DbId,
    pub user_id: DbId,
    pub rating: i64,
    pub review_text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review joined with the reviewer's username and the book title.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewDetail {
    pub id: DbId,
    pub book_id: DbId,
    pub book_title: String,
    pub user_id: DbId,
    pub username: String,
    pub rating: i64,
    pub review_text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a review.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub book_id: DbId,
    pub user_id: DbId,
    pub rating: i64,
    pub review_text: String,
}

/// DTO for changing a review from the staff console. Book and reviewer stay
/// fixed.
#[derive(Debug, Clone)]
pub struct UpdateReview {
    pub rating: i64,
    pub review_text: String,
}

/// Aggregate rating figures for one book.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RatingSummary {
    pub review_count: i64,
    pub average_rating: Option<f64>,
}

/// Admin changelist filters for reviews.
#[derive(Debug, Clone, Default)]
pub struct ReviewAdminFilter {
    pub rating: Option<i64>,
    pub user_id: Option<DbId>,
    pub created: DateFilter,
    /// Case-insensitive substring over book title and username.
    pub search: Option<String>,
}
