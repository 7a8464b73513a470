//! Book field constraints and ISBN handling.

/// Maximum length of a book title.
pub const TITLE_MAX_LEN: usize = 200;
/// Maximum length of an author name.
pub const AUTHOR_MAX_LEN: usize = 100;
/// Maximum length of a genre label.
pub const GENRE_MAX_LEN: usize = 50;
/// Number of digits in an ISBN-13.
pub const ISBN_LEN: usize = 13;

/// Strip the separators people commonly type into an ISBN (hyphens, spaces).
pub fn normalize_isbn(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '-' | ' '))
        .collect()
}

/// Validate an already-normalized ISBN: exactly 13 ASCII digits.
pub fn validate_isbn(isbn: &str) -> Result<(), String> {
    if isbn.len() != ISBN_LEN || !isbn.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("Enter a {ISBN_LEN}-digit ISBN."));
    }
    Ok(())
}
