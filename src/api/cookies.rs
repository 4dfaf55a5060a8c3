//! The `__session` cookie: the only carrier of the session artifact.
//!
//! httpOnly always; `Secure` in production. The value is the opaque session
//! token, never decoded client-side and always verified against the store.

use axum::http::{header, HeaderMap};

pub const SESSION_COOKIE: &str = "__session";

/// Build the Set-Cookie value for a fresh session
pub fn session_cookie(token: &str, max_age_seconds: u64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Max-Age={max_age_seconds}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that deletes the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Extract the session token from a request's Cookie header, if present
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|part| {
        part.trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    })
}
