//! Per-session request serialization.
//!
//! tower-sessions loads a private copy of the session record when a handler
//! first touches it and writes it back after the handler returns. Two
//! overlapping requests with the same cookie would both read the old basket
//! and the later save would drop the other's product. This layer sits outside
//! `SessionManagerLayer` and holds the session's lock from load to save.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use tower_sessions::cookie::Cookie;

use orderly_checkout::BasketLocks;

use super::session::SESSION_COOKIE_NAME;

/// Middleware that runs requests carrying the same session cookie one at a
/// time.
///
/// Requests without a session cookie start a fresh session and are not
/// serialized.
pub async fn serialize_session_requests(
    State(locks): State<BasketLocks>,
    request: Request,
    next: Next,
) -> Response {
    let _guard = match session_cookie(request.headers()) {
        Some(key) => Some(locks.acquire(&key).await),
        None => None,
    };

    next.run(request).await
}

/// The session cookie value, if the request carries one.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
