//! Authentication extractors
//!
//! Resolve the session token into the session's navigation state.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::CookieJar;

use super::session::{Session, verify_session_token};
use crate::AppState;
use crate::data::SessionHandle;
use crate::error::AppError;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
        .or_else(|| {
            let jar = CookieJar::from_headers(headers);
            jar.get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_owned())
        })
}

async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<CurrentUser, AppError> {
    let token = extract_token_from_headers(headers).ok_or(AppError::Unauthorized)?;
    let session = verify_session_token(&token, &state.config.auth.session_secret)?;

    // Logged out or dropped from the cache after idling.
    let context = state
        .sessions
        .get(&session.session_id)
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok(CurrentUser { session, context })
}

/// Extractor for the current authenticated session
///
/// # Usage
/// ```ignore
/// async fn handler(user: CurrentUser) -> impl IntoResponse {
///     let ctx = user.context.lock().await;
///     format!("Hello, {}", user.session.username)
/// }
/// ```
#[derive(Clone)]
pub struct CurrentUser {
    pub session: Session,
    pub context: SessionHandle,
}

impl CurrentUser {
    pub fn username(&self) -> &str {
        &self.session.username
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(user);
        }

        let state = AppState::from_ref(state);
        let user = authenticate(&parts.headers, &state).await?;
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}

/// Optional current user extractor
///
/// Returns None if not authenticated, instead of error.
#[derive(Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(MaybeUser(authenticate(&parts.headers, &state).await.ok()))
    }
}
