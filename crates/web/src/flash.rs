//! One-shot flash messages carried across a redirect in a cookie.
//!
//! A mutating POST redirects with a `Set-Cookie: flash=...`; the next page
//! render reads the messages, shows them once and clears the cookie.

use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::cookies::{clear_cookie, read_cookie, set_cookie};

/// Name of the cookie carrying pending flash messages.
pub const FLASH_COOKIE: &str = "bookreview_flash";

/// Severity of a flash message; doubles as its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Level::Success),
            "info" => Some(Level::Info),
            "warning" => Some(Level::Warning),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

/// A single message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }
}

/// Encode messages as a cookie-safe value.
///
/// Each message is a `level:text` line; the whole block is percent-encoded.
pub fn encode(messages: &[Flash]) -> String {
    let joined = messages
        .iter()
        .map(|flash| format!("{}:{}", flash.level.as_str(), flash.message.replace('\n', " ")))
        .collect::<Vec<_>>()
        .join("\n");
    urlencoding::encode(&joined).into_owned()
}

/// Decode a cookie value produced by [`encode`]. Malformed lines are dropped.
pub fn decode(value: &str) -> Vec<Flash> {
    let Ok(decoded) = urlencoding::decode(value) else {
        return Vec::new();
    };
    decoded
        .lines()
        .filter_map(|line| {
            let (level, message) = line.split_once(':')?;
            Some(Flash {
                level: Level::parse(level)?,
                message: message.to_string(),
            })
        })
        .collect()
}

/// Pending messages from the request cookies.
pub fn take(headers: &HeaderMap) -> Vec<Flash> {
    read_cookie(headers, FLASH_COOKIE)
        .map(|value| decode(&value))
        .unwrap_or_default()
}

/// Append a `Set-Cookie` header without replacing ones already present.
pub fn append_set_cookie(headers: &mut HeaderMap, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(e) => tracing::error!(error = %e, "Refusing to send malformed Set-Cookie header"),
    }
}

/// 303 redirect to `location` that shows `flash` on the next page.
pub fn redirect_with(location: &str, flash: Flash) -> Response {
    let mut response = Redirect::to(location).into_response();
    let cookie = set_cookie(FLASH_COOKIE, &encode(&[flash]), None, false);
    append_set_cookie(response.headers_mut(), &cookie);
    response
}

/// `Set-Cookie` value that discards consumed messages.
pub fn clear() -> String {
    clear_cookie(FLASH_COOKIE)
}
