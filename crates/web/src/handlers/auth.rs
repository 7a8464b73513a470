//! Handlers for registration, login and logout.

use axum::extract::{Query, State};
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use bookreview_core::types::DbId;
use bookreview_db::models::session::CreateSession;
use bookreview_db::models::user::CreateUser;
use bookreview_db::repositories::{SessionRepo, UserRepo};
use serde::Deserialize;

use super::is_unique_violation;
use crate::auth::cookies::{clear_cookie, set_cookie};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{issue_session, SESSION_COOKIE};
use crate::error::{AppError, AppResult};
use crate::flash::{append_set_cookie, redirect_with, Flash};
use crate::forms::account::{LoginForm, RegisterForm, INVALID_LOGIN_MESSAGE};
use crate::forms::FormErrors;
use crate::middleware::auth::{safe_next, MaybeUser};
use crate::middleware::page::PageContext;
use crate::state::AppState;
use crate::templates;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Longest `User-Agent` stored with a session.
const MAX_USER_AGENT_LEN: usize = 512;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /login/`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open a session for `user_id` and attach its cookie to `response`.
async fn start_session(
    state: &AppState,
    user_id: DbId,
    headers: &HeaderMap,
    response: &mut Response,
) -> AppResult<()> {
    let issued = issue_session(user_id, &state.config.session)
        .map_err(|e| AppError::InternalError(format!("Session token error: {e}")))?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect::<String>());

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id,
            token_hash: issued.token_hash,
            expires_at: issued.expires_at,
            user_agent,
        },
    )
    .await?;
    UserRepo::record_successful_login(&state.pool, user_id).await?;

    let cookie = set_cookie(
        SESSION_COOKIE,
        &issued.token,
        Some(state.config.session.max_age_secs()),
        state.config.secure_cookies,
    );
    append_set_cookie(response.headers_mut(), &cookie);
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /register/
pub async fn register_form(ctx: PageContext) -> Response {
    ctx.respond(templates::auth::register(
        &ctx,
        &RegisterForm::default(),
        &FormErrors::new(),
    ))
}

/// POST /register/
///
/// Creates the account and signs the new user in straight away.
pub async fn register_submit(
    State(state): State<AppState>,
    ctx: PageContext,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let render = |errors: &FormErrors| ctx.respond(templates::auth::register(&ctx, &form, errors));

    let clean = match form.clean() {
        Ok(clean) => clean,
        Err(errors) => return Ok(render(&errors)),
    };

    if UserRepo::username_taken(&state.pool, &clean.username).await? {
        let mut errors = FormErrors::new();
        errors.add("username", USERNAME_TAKEN);
        return Ok(render(&errors));
    }

    let password_hash = hash_password(&clean.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username: clean.username,
        email: clean.email,
        password_hash,
        is_staff: false,
    };
    let user = match UserRepo::create(&state.pool, &input).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            let mut errors = FormErrors::new();
            errors.add("username", USERNAME_TAKEN);
            return Ok(render(&errors));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let mut response = redirect_with(
        "/",
        Flash::success(format!(
            "Welcome, {}! Your account has been created.",
            user.username
        )),
    );
    // The account is committed at this point; a session failure only costs
    // the automatic sign-in.
    if let Err(e) = start_session(&state, user.id, &headers, &mut response).await {
        tracing::error!(user_id = user.id, error = %e, "Failed to start session for new account");
        return Ok(redirect_with(
            "/login/",
            Flash::info("Your account has been created. Please log in."),
        ));
    }
    Ok(response)
}

/// GET /login/?next=
pub async fn login_form(ctx: PageContext, Query(query): Query<LoginQuery>) -> Response {
    ctx.respond(templates::auth::login(
        &ctx,
        "",
        query.next.as_deref(),
        &FormErrors::new(),
    ))
}

/// POST /login/
///
/// On success redirects to the (local) `next` target, or `/`. Unknown users,
/// wrong passwords and inactive accounts all get the same message.
pub async fn login_submit(
    State(state): State<AppState>,
    ctx: PageContext,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let render = |errors: &FormErrors| {
        ctx.respond(templates::auth::login(
            &ctx,
            form.username.trim(),
            form.next.as_deref(),
            errors,
        ))
    };

    let (username, password) = match form.clean() {
        Ok(credentials) => credentials,
        Err(errors) => return Ok(render(&errors)),
    };

    let user = UserRepo::find_by_username(&state.pool, &username).await?;
    let verified = match &user {
        Some(user) if user.is_active => verify_password(&password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?,
        _ => false,
    };
    let Some(user) = user.filter(|_| verified) else {
        tracing::info!(username = %username, "Failed login attempt");
        let mut errors = FormErrors::new();
        errors.add_non_field(INVALID_LOGIN_MESSAGE);
        return Ok(render(&errors));
    };

    let mut response = Redirect::to(&safe_next(form.next.as_deref())).into_response();
    start_session(&state, user.id, &headers, &mut response).await?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(response)
}

/// POST /logout/
///
/// Revokes the session server-side and clears the cookie. Safe to call when
/// not signed in.
pub async fn logout(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> AppResult<Response> {
    if let Some(user) = user {
        SessionRepo::revoke_by_token_hash(&state.pool, &user.token_hash).await?;
        tracing::info!(user_id = user.user_id, "User logged out");
    }

    let mut response = redirect_with("/", Flash::info("You have been logged out."));
    append_set_cookie(response.headers_mut(), &clear_cookie(SESSION_COOKIE));
    Ok(response)
}
