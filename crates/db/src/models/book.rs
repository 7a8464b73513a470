//! Book entity model and DTOs.

use bookreview_core::date_filter::DateFilter;
use bookreview_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// A book row from the `books` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_date: NaiveDate,
    pub isbn: String,
    pub description: String,
    /// Path of the cover image relative to the media root.
    pub cover_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new book.
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_date: NaiveDate,
    pub isbn: String,
    pub description: String,
    pub cover_image: Option<String>,
}

/// DTO for editing a book. Every text field is replaced; the cover is only
/// replaced when `cover_image` is `Some`.
#[derive(Debug, Clone)]
pub struct UpdateBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_date: NaiveDate,
    pub isbn: String,
    pub description: String,
    pub cover_image: Option<String>,
}

/// Admin changelist filters for books.
#[derive(Debug, Clone, Default)]
pub struct BookAdminFilter {
    /// Exact genre match.
    pub genre: Option<String>,
    pub published: DateFilter,
    pub created: DateFilter,
    /// Case-insensitive substring over title, author and ISBN.
    pub search: Option<String>,
}
