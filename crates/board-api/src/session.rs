//! # Sessions & Caller
//!
//! Sessions are identified by a UUID carried in a cookie. The failure
//! boundary resolves (or mints) the id on every request and injects a
//! [`SessionId`] into the request extensions; handlers extract a
//! [`Caller`] to learn who, if anyone, is signed in.
//!
//! Minting an id stores nothing. A [`SessionRecord`] exists only between
//! [`sign_in`] and [`sign_out`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub const LOGIN_REQUIRED: &str = "로그인이 필요합니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

/// The signed-in principal stored in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub user_name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub user: SessionUser,
}

/// Read the session id from the `cookie_name` cookie.
///
/// Returns the id and whether it was freshly minted (absent or unparseable).
pub fn resolve_session(headers: &HeaderMap, cookie_name: &str) -> (SessionId, bool) {
    let existing = CookieJar::from_headers(headers)
        .get(cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    match existing {
        Some(id) => (SessionId(id), false),
        None => (SessionId(Uuid::new_v4()), true),
    }
}

/// The `Set-Cookie` value that binds the client to `session`.
pub fn session_cookie(cookie_name: &str, session: SessionId) -> Option<HeaderValue> {
    let cookie = Cookie::build((cookie_name.to_owned(), session.0.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Store `user` as the principal of `session`.
pub fn sign_in(state: &AppState, session: SessionId, user: SessionUser) {
    state.sessions.insert(session.0, SessionRecord { user });
}

/// Drop the record of `session`. The cookie stays valid as an anonymous id.
pub fn sign_out(state: &AppState, session: SessionId) {
    state.sessions.remove(&session.0);
}

/// The requesting session and its principal, if signed in.
#[derive(Debug, Clone)]
pub struct Caller {
    pub session: SessionId,
    pub user: Option<SessionUser>,
}

impl Caller {
    /// The signed-in user, or `AccessDenied` for anonymous callers.
    pub fn require_user(&self) -> Result<&SessionUser, AppError> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::AccessDenied(LOGIN_REQUIRED.into()))
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Extracts the caller from the session id the boundary injected.
///
/// A missing id means the boundary is not mounted; that is an internal
/// error, not an anonymous caller.
#[axum::async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<SessionId>()
            .copied()
            .ok_or_else(|| AppError::Internal("no session id in request context".into()))?;
        let user = state.sessions.get(&session.0).map(|r| r.user);
        Ok(Self { session, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn resolves_existing_cookie() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; BOARD_SESSION={id}")).unwrap(),
        );
        assert_eq!(resolve_session(&headers, "BOARD_SESSION"), (SessionId(id), false));
    }

    #[test]
    fn mints_when_absent_or_garbage() {
        let (_, fresh) = resolve_session(&HeaderMap::new(), "BOARD_SESSION");
        assert!(fresh);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("BOARD_SESSION=nope"));
        let (_, fresh) = resolve_session(&headers, "BOARD_SESSION");
        assert!(fresh);
    }

    #[test]
    fn resolves_across_multiple_cookie_headers() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_str(&format!("BOARD_SESSION={id}")).unwrap(),
        );
        assert_eq!(resolve_session(&headers, "BOARD_SESSION"), (SessionId(id), false));
    }

    #[test]
    fn cookie_value_shape() {
        let id = SessionId(Uuid::nil());
        let value = session_cookie("BOARD_SESSION", id).unwrap();
        let cookie = Cookie::parse(value.to_str().unwrap().to_owned()).unwrap();
        assert_eq!(cookie.name(), "BOARD_SESSION");
        assert_eq!(cookie.value(), "00000000-0000-0000-0000-000000000000");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn sign_in_and_out() {
        let state = AppState::new();
        let session = SessionId(Uuid::new_v4());
        sign_in(
            &state,
            session,
            SessionUser {
                id: 1,
                user_name: "kim".into(),
                email: "kim@example.com".into(),
            },
        );
        assert_eq!(state.sessions.get(&session.0).unwrap().user.user_name, "kim");
        sign_out(&state, session);
        assert!(state.sessions.get(&session.0).is_none());
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn anonymous_caller_is_denied() {
        let caller = Caller {
            session: SessionId(Uuid::new_v4()),
            user: None,
        };
        match caller.require_user() {
            Err(AppError::AccessDenied(m)) => assert_eq!(m, LOGIN_REQUIRED),
            other => panic!("expected AccessDenied, got {other:?}"),
        }
    }
}
