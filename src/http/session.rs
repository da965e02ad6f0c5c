//! Session handling: login, logout, current user.
//!
//! The session is a single signed cookie holding the user name.

use axum::{
    extract::Form,
    http::{header, HeaderMap},
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use serde::Deserialize;

use crate::config::schema::SessionConfig;

/// Name of the session cookie.
pub const USER_COOKIE: &str = "user";

/// Error building the cookie signing key.
#[derive(Debug, thiserror::Error)]
#[error("invalid session secret: {0}")]
pub struct SessionKeyError(String);

/// Signing key from the configured secret, or a random one.
pub fn session_key(config: &SessionConfig) -> Result<Key, SessionKeyError> {
    match &config.secret {
        Some(secret) => Key::try_from(secret.as_bytes()).map_err(|e| SessionKeyError(e.to_string())),
        None => {
            tracing::warn!("No session secret configured, sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}

/// The logged-in user, if any.
pub fn current_user(jar: &SignedCookieJar) -> Option<String> {
    jar.get(USER_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|user| !user.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
}

pub async fn login(
    jar: SignedCookieJar,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> (SignedCookieJar, Redirect) {
    let username = form.username.trim().to_string();
    let target = referrer(&headers);

    if username.is_empty() {
        return (jar.remove(Cookie::build(USER_COOKIE).path("/")), Redirect::to(&target));
    }

    tracing::info!(user = %username, "User logged in");
    let cookie = Cookie::build((USER_COOKIE, username)).path("/").http_only(true);
    (jar.add(cookie), Redirect::to(&target))
}

pub async fn logout(jar: SignedCookieJar, headers: HeaderMap) -> (SignedCookieJar, Redirect) {
    let target = referrer(&headers);
    (jar.remove(Cookie::build(USER_COOKIE).path("/")), Redirect::to(&target))
}

/// Where to send the browser after a session change.
fn referrer(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("/")
        .to_string()
}
