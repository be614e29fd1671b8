use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::AppError;
use crate::models::User;
use crate::session::SessionRegistry;
use crate::AppState;

pub const SESSION_COOKIE: &str = "session_token";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no valid session")]
    Unauthenticated,
    #[error("session user no longer exists")]
    UserNotFound,
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value())
}

pub fn is_authenticated(jar: &CookieJar, sessions: &SessionRegistry) -> bool {
    session_token(jar)
        .and_then(|token| sessions.resolve(token))
        .is_some()
}

/// Resolve the session cookie to a full user record.
pub async fn current_user(jar: &CookieJar, state: &AppState) -> Result<User, AuthError> {
    let user_id = session_token(jar)
        .and_then(|token| state.sessions.resolve(token))
        .ok_or(AuthError::Unauthenticated)?;

    User::find_by_id(&state.db, user_id)
        .await
        .map_err(AuthError::Database)?
        .ok_or(AuthError::UserNotFound)
}

/// Extractor for protected handlers. Anonymous callers are redirected to
/// the login page and the handler never runs.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        match current_user(&jar, &state).await {
            Ok(user) => Ok(AuthUser(user)),
            Err(AuthError::Database(e)) => Err(AuthRejection::Fault(AppError::Database(e))),
            Err(e) => {
                tracing::debug!(path = %parts.uri.path(), "rejecting request: {e}");
                Err(AuthRejection::Login {
                    htmx: is_htmx_request(parts),
                })
            }
        }
    }
}

/// Extractor for public pages that render differently for signed-in users.
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        match current_user(&jar, &state).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(AuthError::Database(e)) => Err(AppError::Database(e)),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}

fn is_htmx_request(parts: &Parts) -> bool {
    parts
        .headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

pub enum AuthRejection {
    /// Send the caller to the login page. htmx requests get an
    /// `HX-Redirect` on a non-redirect status, since the browser would
    /// otherwise follow a 303 transparently and swap the login page into
    /// the fragment target.
    Login { htmx: bool },
    Fault(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Login { htmx: true } => {
                (StatusCode::UNAUTHORIZED, [("HX-Redirect", "/login")]).into_response()
            }
            AuthRejection::Login { htmx: false } => Redirect::to("/login").into_response(),
            AuthRejection::Fault(e) => e.into_response(),
        }
    }
}

/// Start a session for `user` and attach its cookie to `jar`. A session the
/// browser was already carrying is revoked first.
pub fn login_user(jar: CookieJar, sessions: &SessionRegistry, user: &User, secure: bool) -> CookieJar {
    if let Some(previous) = session_token(&jar) {
        sessions.revoke(previous);
    }
    let token = sessions.create(user.id);
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Revoke the session named by the cookie, if any, and clear the cookie.
pub fn logout_user(jar: CookieJar, sessions: &SessionRegistry) -> CookieJar {
    let Some(token) = session_token(&jar) else {
        return jar;
    };
    sessions.revoke(token);
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
