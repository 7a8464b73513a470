//! Free-text catalog search helpers.
//!
//! Searches are case-insensitive substring matches. SQLite's `LOWER` and
//! `LIKE` only fold ASCII, so searchable text is stored a second time in a
//! `*_folded` column produced by [`fold_case`], and queries are folded the same
//! way. The query is then turned into a `LIKE` pattern with the wildcard
//! characters escaped, so a user typing `100%` matches the literal text and
//! not everything that starts with `100`.

/// Escape character used in generated `LIKE` patterns (`... ESCAPE '\'`).
pub const LIKE_ESCAPE: char = '\\';

/// Trim a raw query; blank or missing queries mean "no filter".
pub fn normalize_query(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

/// Unicode lowercase form used for every stored and queried search key.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Build a folded `%...%` pattern matching `query` as a literal substring.
///
/// Pair with `<column>_folded LIKE ? ESCAPE '\'`.
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in fold_case(query).chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
