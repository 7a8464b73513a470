//! Query-string filters for the admin changelists.
//!
//! Each struct round-trips: it deserializes from the request query and
//! [`href`](BookListQuery::href) rebuilds a link carrying the same filters,
//! so sidebar links can change one filter and keep the rest. Values that do
//! not parse, as in a hand-edited URL, are ignored rather than rejected.

use std::str::FromStr;

use bookreview_core::date_filter::DateFilter;
use bookreview_core::search::normalize_query;
use bookreview_core::types::DbId;
use bookreview_db::models::book::BookAdminFilter;
use bookreview_db::models::review::ReviewAdminFilter;
use serde::{Deserialize, Deserializer};

/// `GET /admin/books/` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookListQuery {
    pub genre: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub published: DateFilter,
    #[serde(deserialize_with = "lenient")]
    pub created: DateFilter,
    pub q: Option<String>,
}

impl BookListQuery {
    pub fn to_filter(&self) -> BookAdminFilter {
        BookAdminFilter {
            genre: normalize_query(self.genre.as_deref()),
            published: self.published,
            created: self.created,
            search: normalize_query(self.q.as_deref()),
        }
    }

    pub fn href(&self) -> String {
        let mut params = Vec::new();
        if let Some(genre) = normalize_query(self.genre.as_deref()) {
            params.push(("genre", genre));
        }
        if self.published != DateFilter::Any {
            params.push(("published", self.published.slug().to_string()));
        }
        if self.created != DateFilter::Any {
            params.push(("created", self.created.slug().to_string()));
        }
        if let Some(q) = normalize_query(self.q.as_deref()) {
            params.push(("q", q));
        }
        with_query("/admin/books/", &params)
    }
}

/// `GET /admin/reviews/` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReviewListQuery {
    #[serde(deserialize_with = "lenient_opt")]
    pub rating: Option<i64>,
    #[serde(deserialize_with = "lenient_opt")]
    pub user: Option<DbId>,
    #[serde(deserialize_with = "lenient")]
    pub created: DateFilter,
    pub q: Option<String>,
}

impl ReviewListQuery {
    pub fn to_filter(&self) -> ReviewAdminFilter {
        ReviewAdminFilter {
            rating: self.rating,
            user_id: self.user,
            created: self.created,
            search: normalize_query(self.q.as_deref()),
        }
    }

    pub fn href(&self) -> String {
        let mut params = Vec::new();
        if let Some(rating) = self.rating {
            params.push(("rating", rating.to_string()));
        }
        if let Some(user) = self.user {
            params.push(("user", user.to_string()));
        }
        if self.created != DateFilter::Any {
            params.push(("created", self.created.slug().to_string()));
        }
        if let Some(q) = normalize_query(self.q.as_deref()) {
            params.push(("q", q));
        }
        with_query("/admin/reviews/", &params)
    }
}

/// Parse a query value, falling back to the default when it is blank or bad.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    Ok(lenient_opt(deserializer)?.unwrap_or_default())
}

fn lenient_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}
