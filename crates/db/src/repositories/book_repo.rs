//! Repository for the `books` table.

use bookreview_core::search::{contains_pattern, fold_case};
use bookreview_core::types::DbId;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::models::book::{Book, BookAdminFilter, CreateBook, UpdateBook};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, author, genre, publication_date, isbn, description, \
                       cover_image, created_at, updated_at";

/// Provides CRUD and search operations for books.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new book, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateBook) -> Result<Book, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO books (title, author, genre, publication_date, isbn, description,
                                cover_image, title_folded, author_folded, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.genre)
            .bind(input.publication_date)
            .bind(&input.isbn)
            .bind(&input.description)
            .bind(&input.cover_image)
            .bind(fold_case(&input.title))
            .bind(fold_case(&input.author))
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a book by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = ?");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the whole catalog ordered by title.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books ORDER BY title COLLATE NOCASE, id");
        sqlx::query_as::<_, Book>(&query).fetch_all(pool).await
    }

    /// Books whose title or author contains `term`, ignoring case.
    pub async fn search(pool: &SqlitePool, term: &str) -> Result<Vec<Book>, sqlx::Error> {
        let pattern = contains_pattern(term);
        let query = format!(
            "SELECT {COLUMNS} FROM books
             WHERE title_folded LIKE ? ESCAPE '\\'
                OR author_folded LIKE ? ESCAPE '\\'
             ORDER BY title COLLATE NOCASE, id"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(pool)
            .await
    }

    /// The most recently added books, newest first.
    pub async fn list_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Book>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM books ORDER BY created_at DESC, id DESC LIMIT ?");
        sqlx::query_as::<_, Book>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count all books.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Whether another book already uses `isbn`. Pass the book being edited
    /// as `exclude_id` so it does not conflict with itself.
    pub async fn isbn_taken(
        pool: &SqlitePool,
        isbn: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (i64,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = ? AND id IS NOT ?)",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(taken != 0)
    }

    /// Replace a book's fields.
    ///
    /// The cover is only replaced when `input.cover_image` is `Some`.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET
                title = ?,
                author = ?,
                genre = ?,
                publication_date = ?,
                isbn = ?,
                description = ?,
                cover_image = COALESCE(?, cover_image),
                title_folded = ?,
                author_folded = ?,
                updated_at = ?
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.genre)
            .bind(input.publication_date)
            .bind(&input.isbn)
            .bind(&input.description)
            .bind(&input.cover_image)
            .bind(fold_case(&input.title))
            .bind(fold_case(&input.author))
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a book (its reviews go with it) and return the deleted row.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("DELETE FROM books WHERE id = ? RETURNING {COLUMNS}");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Distinct genres in the catalog, for the admin genre filter.
    pub async fn list_genres(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT genre FROM books ORDER BY genre COLLATE NOCASE")
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(genre,)| genre).collect())
    }

    /// Admin changelist: apply the sidebar filters and search box.
    ///
    /// Date filters are evaluated relative to `today`. Newest first.
    pub async fn admin_list(
        pool: &SqlitePool,
        filter: &BookAdminFilter,
        today: NaiveDate,
    ) -> Result<Vec<Book>, sqlx::Error> {
        // Build dynamic WHERE clauses.
        let mut conditions = Vec::new();

        if filter.genre.is_some() {
            conditions.push("genre = ?");
        }
        let published = filter.published.range(today);
        if published.is_some() {
            conditions.push("publication_date >= ? AND publication_date < ?");
        }
        let created = filter.created.range(today);
        if created.is_some() {
            conditions.push("date(created_at) >= ? AND date(created_at) < ?");
        }
        let pattern = filter.search.as_deref().map(contains_pattern);
        if pattern.is_some() {
            conditions.push(
                "(title_folded LIKE ? ESCAPE '\\' \
                  OR author_folded LIKE ? ESCAPE '\\' \
                  OR isbn LIKE ? ESCAPE '\\')",
            );
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM books {where_clause} ORDER BY created_at DESC, id DESC"
        );
        let mut q = sqlx::query_as::<_, Book>(&query);

        // Bind dynamic parameters in order.
        if let Some(ref genre) = filter.genre {
            q = q.bind(genre);
        }
        if let Some((start, end)) = published {
            q = q.bind(start).bind(end);
        }
        if let Some((start, end)) = created {
            q = q.bind(start).bind(end);
        }
        if let Some(ref pattern) = pattern {
            q = q.bind(pattern).bind(pattern).bind(pattern);
        }

        q.fetch_all(pool).await
    }
}
