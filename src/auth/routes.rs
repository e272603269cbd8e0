//! Registration, login and logout
//!
//! JSON endpoints under `/api/v1/auth` plus the plain HTML login page and
//! its form posts.

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};

use super::middleware::{CurrentUser, SESSION_COOKIE};
use super::session::{Session, create_session_token};
use crate::AppState;
use crate::error::AppError;
use crate::navigation::SessionContext;
use crate::service::AccountService;

/// Create authentication router
///
/// Routes:
/// - GET /login - Login page
/// - POST /login, POST /register, POST /logout - HTML form posts
/// - POST /api/v1/auth/{register,login,logout} - JSON API
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_form))
        .route("/register", post(register_form))
        .route("/logout", post(logout_form))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
}

/// Username/password pair used by both login and registration
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

// =============================================================================
// Session lifecycle
// =============================================================================

/// Verify credentials and open a session
async fn start_session(
    state: &AppState,
    credentials: &Credentials,
) -> Result<(String, Cookie<'static>), AppError> {
    AccountService::new(state.store.clone())
        .authenticate(&credentials.username, &credentials.password)
        .await?;

    let session = Session::new(&credentials.username, state.config.auth.session_max_age);
    let token = create_session_token(&session, &state.config.auth.session_secret)?;
    state
        .sessions
        .insert(
            &session.session_id,
            SessionContext::logged_in(&credentials.username),
        )
        .await;

    tracing::info!(username = %credentials.username, "User logged in");

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.config.should_use_secure_cookies())
        .same_site(SameSite::Lax)
        .build();

    Ok((token, cookie))
}

async fn end_session(state: &AppState, user: &CurrentUser) {
    user.context.lock().await.logout();
    state.sessions.remove(&user.session.session_id).await;
    tracing::info!(username = %user.username(), "User logged out");
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

// =============================================================================
// JSON API
// =============================================================================

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    AccountService::new(state.store.clone())
        .register(&credentials.username, &credentials.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "username": credentials.username })),
    ))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let (token, cookie) = start_session(&state, &credentials).await?;

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            username: credentials.username,
            token,
        }),
    ))
}

/// POST /api/v1/auth/logout
async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> impl IntoResponse {
    end_session(&state, &user).await;
    (jar.remove(removal_cookie()), StatusCode::NO_CONTENT)
}

// =============================================================================
// HTML forms
// =============================================================================

fn render_login_page(message: Option<&str>) -> Html<String> {
    let notice = message
        .map(|text| format!("<p class=\"notice\">{}</p>", html_escape::encode_text(text)))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Login - Beethoven</title></head>
<body>
    <h1>Beethoven</h1>
    {notice}
    <h2>Log in</h2>
    <form method="post" action="/login">
        <input name="username" placeholder="Username">
        <input name="password" type="password" placeholder="Password">
        <button type="submit">Log in</button>
    </form>
    <h2>Sign up</h2>
    <form method="post" action="/register">
        <input name="username" placeholder="New username">
        <input name="password" type="password" placeholder="New password">
        <button type="submit">Create account</button>
    </form>
</body>
</html>
"#
    ))
}

/// GET /login
async fn login_page() -> impl IntoResponse {
    render_login_page(None)
}

/// POST /login
async fn login_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    match start_session(&state, &credentials).await {
        Ok((_, cookie)) => Ok((jar.add(cookie), Redirect::to("/")).into_response()),
        Err(AppError::Unauthorized) => Ok((
            StatusCode::UNAUTHORIZED,
            render_login_page(Some("Wrong username or password.")),
        )
            .into_response()),
        Err(error) => Err(error),
    }
}

/// POST /register
async fn register_form(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    let result = AccountService::new(state.store.clone())
        .register(&credentials.username, &credentials.password)
        .await;

    match result {
        Ok(()) => Ok(render_login_page(Some("Account created, you can log in.")).into_response()),
        Err(AppError::Validation(message)) => {
            Ok((StatusCode::BAD_REQUEST, render_login_page(Some(&message))).into_response())
        }
        Err(AppError::Conflict(message)) => {
            Ok((StatusCode::CONFLICT, render_login_page(Some(&message))).into_response())
        }
        Err(error) => Err(error),
    }
}

/// POST /logout
async fn logout_form(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> impl IntoResponse {
    end_session(&state, &user).await;
    (jar.remove(removal_cookie()), Redirect::to("/login"))
}
