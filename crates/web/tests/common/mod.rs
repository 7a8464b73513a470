#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use bookreview_core::types::DbId;
use bookreview_db::models::book::{Book, CreateBook};
use bookreview_db::models::review::{CreateReview, Review};
use bookreview_db::models::session::CreateSession;
use bookreview_db::models::user::{CreateUser, User};
use bookreview_db::repositories::{BookRepo, ReviewRepo, SessionRepo, UserRepo};
use bookreview_db::DbPool;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use bookreview_web::auth::session::{issue_session, SessionConfig, SESSION_COOKIE};
use bookreview_web::config::ServerConfig;
use bookreview_web::flash::{self, Flash, FLASH_COOKIE};
use bookreview_web::media::MediaStore;
use bookreview_web::router::build_app_router;
use bookreview_web::state::AppState;

/// Smallest byte string that sniffs as a PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

const BOUNDARY: &str = "bookreview-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        media_root: media_root.to_path_buf(),
        request_timeout_secs: 30,
        secure_cookies: false,
        session: SessionConfig {
            secret: "test-session-secret".to_string(),
            expiry_days: 14,
        },
    }
}

/// The full application over a migrated in-memory database and a temporary
/// media directory.
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    pub config: ServerConfig,
    pub media: Arc<MediaStore>,
    _media_dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let pool = bookreview_db::create_pool("sqlite::memory:")
        .await
        .expect("in-memory pool should open");
    bookreview_db::run_migrations(&pool)
        .await
        .expect("migrations should apply");

    let media_dir = tempfile::tempdir().expect("temp media dir");
    let config = test_config(media_dir.path());
    let media = Arc::new(MediaStore::new(media_dir.path()));

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        media: Arc::clone(&media),
    };
    let router = build_app_router(state, &config);

    TestApp {
        router,
        pool,
        config,
        media,
        _media_dir: media_dir,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// POST an urlencoded form built from `fields`.
    pub async fn post_form(
        &self,
        uri: &str,
        cookie: Option<&str>,
        fields: &[(&str, &str)],
    ) -> Response<Body> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// POST a multipart form with text `fields` and an optional cover file.
    pub async fn post_multipart(
        &self,
        uri: &str,
        cookie: Option<&str>,
        fields: &[(&str, &str)],
        cover: Option<&[u8]>,
    ) -> Response<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = cover {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"cover_image\"; \
                     filename=\"cover.png\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a 303 redirect and return its target.
pub fn redirect_target(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(LOCATION)
        .expect("redirect has a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Value the response sets for cookie `name`, if any.
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Flash messages the response queues for the next page.
pub fn flashes(response: &Response<Body>) -> Vec<Flash> {
    set_cookie(response, FLASH_COOKIE)
        .map(|value| flash::decode(&value))
        .unwrap_or_default()
}

/// `Cookie` header that presents the session set by `response`.
pub fn session_cookie_from(response: &Response<Body>) -> String {
    let token = set_cookie(response, SESSION_COOKIE).expect("response sets a session cookie");
    format!("{SESSION_COOKIE}={token}")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly. The password hash is a placeholder, so this user
/// can only be signed in with [`sign_in`].
pub async fn create_user(pool: &DbPool, username: &str, is_staff: bool) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "not-a-real-hash".to_string(),
        is_staff,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

/// Open a session for `user_id` and return its `Cookie` header value.
pub async fn sign_in(app: &TestApp, user_id: DbId) -> String {
    let issued = issue_session(user_id, &app.config.session).unwrap();
    SessionRepo::create(
        &app.pool,
        &CreateSession {
            user_id,
            token_hash: issued.token_hash,
            expires_at: issued.expires_at,
            user_agent: None,
        },
    )
    .await
    .unwrap();
    format!("{SESSION_COOKIE}={}", issued.token)
}

pub async fn create_book(pool: &DbPool, title: &str, author: &str, isbn: &str) -> Book {
    create_book_in_genre(pool, title, author, isbn, "Fiction").await
}

pub async fn create_book_in_genre(
    pool: &DbPool,
    title: &str,
    author: &str,
    isbn: &str,
    genre: &str,
) -> Book {
    let input = CreateBook {
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        publication_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
        isbn: isbn.to_string(),
        description: String::new(),
        cover_image: None,
    };
    BookRepo::create(pool, &input).await.unwrap()
}

pub async fn create_review(pool: &DbPool, book_id: DbId, user_id: DbId, rating: i64) -> Review {
    let input = CreateReview {
        book_id,
        user_id,
        rating,
        review_text: "Would read again.".to_string(),
    };
    ReviewRepo::create(pool, &input).await.unwrap()
}

pub async fn count_rows(pool: &DbPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Fields of a valid book submission.
pub fn book_fields<'a>(title: &'a str, isbn: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("title", title),
        ("author", "Frank Herbert"),
        ("genre", "Science Fiction"),
        ("publication_date", "1965-08-01"),
        ("isbn", isbn),
        ("description", "Spice and sand."),
    ]
}

/// Flag a user inactive, as an operator would by hand.
pub async fn deactivate_user(pool: &DbPool, user_id: DbId) {
    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}
