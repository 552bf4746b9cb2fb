//! # Login Gate
//!
//! Every routed path requires a signed-in session except the ones listed
//! in [`PUBLIC_PATHS`]. An anonymous request to a gated path raises
//! `AccessDenied` before any extractor runs, so the failure boundary turns
//! it into an envelope or a flash redirect like any other failure.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::session::SessionId;
use crate::state::AppState;

pub const UNAUTHENTICATED: &str = "인증되지 않았습니다";

/// How a public path entry matches a request path.
#[derive(Debug, Clone, Copy)]
enum PathMatch {
    Exact(&'static str),
    /// The path itself and everything below it.
    Subtree(&'static str),
}

impl PathMatch {
    fn matches(self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == p,
            Self::Subtree(p) => path
                .strip_prefix(p)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

const PUBLIC_PATHS: &[PathMatch] = &[
    PathMatch::Exact("/"),
    PathMatch::Exact("/login-form"),
    PathMatch::Exact("/login"),
    PathMatch::Exact("/join-form"),
    PathMatch::Exact("/join"),
    PathMatch::Exact("/openapi.json"),
    PathMatch::Subtree("/board/detail"),
    PathMatch::Subtree("/api"),
];

/// Whether `path` is reachable without signing in.
pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|rule| rule.matches(path))
}

/// Reject anonymous callers on gated paths.
///
/// Runs inside the failure boundary, which has already injected the
/// [`SessionId`].
pub async fn require_login(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path();
    if is_public(path) {
        return Ok(next.run(request).await);
    }

    let signed_in = request
        .extensions()
        .get::<SessionId>()
        .and_then(|session| state.sessions.get(&session.0))
        .is_some();
    if !signed_in {
        tracing::debug!(path = %path, "anonymous request to gated path");
        return Err(AppError::AccessDenied(UNAUTHENTICATED.into()));
    }
    Ok(next.run(request).await)
}
