//! Book add/edit form, submitted as `multipart/form-data` so it can carry a
//! cover image.

use axum::extract::Multipart;
use bookreview_core::books::{normalize_isbn, validate_isbn};
use bookreview_db::models::book::{Book, CreateBook, UpdateBook};
use chrono::NaiveDate;
use validator::Validate;

use super::{required, FormErrors};
use crate::error::AppError;
use crate::media::sniff_image;

/// Message for an ISBN that another book already uses.
pub const DUPLICATE_ISBN_MESSAGE: &str = "Book with this ISBN already exists.";

/// Text fields of the book form, as typed.
#[derive(Debug, Clone, Default, Validate)]
pub struct BookForm {
    #[validate(
        custom(function = "required"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,
    #[validate(
        custom(function = "required"),
        length(max = 100, message = "Ensure this value has at most 100 characters.")
    )]
    pub author: String,
    #[validate(
        custom(function = "required"),
        length(max = 50, message = "Ensure this value has at most 50 characters.")
    )]
    pub genre: String,
    #[validate(custom(function = "required"))]
    pub publication_date: String,
    #[validate(custom(function = "required"))]
    pub isbn: String,
    pub description: String,
}

/// A full multipart submission: the text fields plus an optional upload.
#[derive(Debug, Clone, Default)]
pub struct BookSubmission {
    pub form: BookForm,
    /// Raw bytes of the uploaded cover, if a file was chosen.
    pub cover: Option<Vec<u8>>,
}

/// Validated book values, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_date: NaiveDate,
    pub isbn: String,
    pub description: String,
    /// Cover bytes that were sniffed as a supported image.
    pub cover: Option<Vec<u8>>,
}

impl CleanBook {
    pub fn into_create(self, cover_image: Option<String>) -> CreateBook {
        CreateBook {
            title: self.title,
            author: self.author,
            genre: self.genre,
            publication_date: self.publication_date,
            isbn: self.isbn,
            description: self.description,
            cover_image,
        }
    }

    pub fn into_update(self, cover_image: Option<String>) -> UpdateBook {
        UpdateBook {
            title: self.title,
            author: self.author,
            genre: self.genre,
            publication_date: self.publication_date,
            isbn: self.isbn,
            description: self.description,
            cover_image,
        }
    }
}

impl BookForm {
    /// Prefill the edit form from a stored book.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            publication_date: book.publication_date.format("%Y-%m-%d").to_string(),
            isbn: book.isbn.clone(),
            description: book.description.clone(),
        }
    }

    fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            genre: self.genre.trim().to_string(),
            publication_date: self.publication_date.trim().to_string(),
            isbn: normalize_isbn(self.isbn.trim()),
            description: self.description.trim().to_string(),
        }
    }
}

impl BookSubmission {
    /// Read the book fields and cover upload from a multipart body.
    ///
    /// Unknown fields are ignored. An empty file part (no file chosen) counts
    /// as no upload.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut submission = BookSubmission::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "cover_image" => {
                    let data = field.bytes().await?;
                    if !data.is_empty() {
                        submission.cover = Some(data.to_vec());
                    }
                }
                "title" => submission.form.title = field.text().await?,
                "author" => submission.form.author = field.text().await?,
                "genre" => submission.form.genre = field.text().await?,
                "publication_date" => submission.form.publication_date = field.text().await?,
                "isbn" => submission.form.isbn = field.text().await?,
                "description" => submission.form.description = field.text().await?,
                _ => {} // ignore unknown fields
            }
        }

        Ok(submission)
    }

    /// Validate every field. ISBN uniqueness needs the database and is
    /// checked by the handler afterwards.
    pub fn clean(&self) -> Result<CleanBook, FormErrors> {
        let form = self.form.trimmed();
        let mut errors = match form.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from_validation(&e),
        };

        let publication_date = if errors.has("publication_date") {
            None
        } else {
            let parsed = NaiveDate::parse_from_str(&form.publication_date, "%Y-%m-%d").ok();
            if parsed.is_none() {
                errors.add("publication_date", "Enter a valid date.");
            }
            parsed
        };

        if !errors.has("isbn") {
            if let Err(message) = validate_isbn(&form.isbn) {
                errors.add("isbn", message);
            }
        }

        if let Some(bytes) = &self.cover {
            if let Err(e) = sniff_image(bytes) {
                errors.add("cover_image", e.to_string());
            }
        }

        match publication_date {
            Some(publication_date) if errors.is_empty() => Ok(CleanBook {
                title: form.title,
                author: form.author,
                genre: form.genre,
                publication_date,
                isbn: form.isbn,
                description: form.description,
                cover: self.cover.clone(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::REQUIRED_MESSAGE;

    fn submission() -> BookSubmission {
        BookSubmission {
            form: BookForm {
                title: " The Left Hand of Darkness ".into(),
                author: "Ursula K. Le Guin".into(),
                genre: "Science Fiction".into(),
                publication_date: "1969-03-01".into(),
                isbn: "978-0-441-47812-5".into(),
                description: String::new(),
            },
            cover: None,
        }
    }

    #[test]
    fn valid_submission_is_normalized() {
        let clean = submission().clean().unwrap();
        assert_eq!(clean.title, "The Left Hand of Darkness");
        assert_eq!(clean.isbn, "9780441478125");
        assert_eq!(
            clean.publication_date,
            NaiveDate::from_ymd_opt(1969, 3, 1).unwrap()
        );
        assert_eq!(clean.description, "");
        assert_eq!(clean.cover, None);
    }

    #[test]
    fn missing_fields_are_required() {
        let errors = BookSubmission::default().clean().unwrap_err();
        for field in ["title", "author", "genre", "publication_date", "isbn"] {
            assert_eq!(errors.field(field), [REQUIRED_MESSAGE], "field {field}");
        }
        assert!(!errors.has("description"));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut sub = submission();
        sub.form.title = "x".repeat(201);
        let errors = sub.clean().unwrap_err();
        assert_eq!(
            errors.field("title"),
            ["Ensure this value has at most 200 characters."]
        );
    }

    #[test]
    fn bad_date_and_isbn() {
        let mut sub = submission();
        sub.form.publication_date = "03/01/1969".into();
        sub.form.isbn = "12345".into();
        let errors = sub.clean().unwrap_err();
        assert_eq!(errors.field("publication_date"), ["Enter a valid date."]);
        assert_eq!(errors.field("isbn"), ["Enter a 13-digit ISBN."]);
    }

    #[test]
    fn non_image_cover_is_rejected() {
        let mut sub = submission();
        sub.cover = Some(b"plain text, not a picture".to_vec());
        let errors = sub.clean().unwrap_err();
        assert!(errors.field("cover_image")[0].starts_with("Upload a valid image."));
    }

    #[test]
    fn edit_form_prefills_iso_date() {
        let clean = submission().clean().unwrap();
        let now = chrono::Utc::now();
        let book = Book {
            id: 1,
            title: clean.title,
            author: clean.author,
            genre: clean.genre,
            publication_date: clean.publication_date,
            isbn: clean.isbn,
            description: clean.description,
            cover_image: None,
            created_at: now,
            updated_at: now,
        };
        let form = BookForm::from_book(&book);
        assert_eq!(form.publication_date, "1969-03-01");
        assert_eq!(form.isbn, "9780441478125");
    }
}
