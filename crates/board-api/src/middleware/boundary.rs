//! # Failure Boundary
//!
//! The single place raised errors become client responses. Every routed
//! request passes through [`failure_boundary`], which:
//!
//! 1. resolves the session id from the cookie (minting one if needed, with
//!    nothing stored) and injects it for the [`crate::session::Caller`]
//!    extractor,
//! 2. records the content preference and path,
//! 3. runs the handler,
//! 4. if the handler raised an [`AppError`], replaces the response with
//!    the synthesized one,
//! 5. sets the session cookie when the id was freshly minted.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::Raised;
use crate::negotiation::ContentPreference;
use crate::session::{resolve_session, session_cookie};
use crate::state::AppState;
use crate::synthesize::{synthesize, RequestFacts};

pub async fn failure_boundary(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let (session, fresh) = resolve_session(request.headers(), &state.config.session_cookie);
    request.extensions_mut().insert(session);

    let facts = RequestFacts {
        preference: ContentPreference::from_headers(request.headers()),
        path: request.uri().path().to_string(),
    };

    let mut response = next.run(request).await;

    if let Some(Raised(error)) = response.extensions_mut().remove::<Raised>() {
        let flash = state.flash.channel(session);
        response = synthesize(error, &facts, &flash).into_response(state.renderer.as_ref());
    }

    if fresh {
        match session_cookie(&state.config.session_cookie, session) {
            Some(cookie) => {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            None => tracing::warn!(
                cookie = %state.config.session_cookie,
                "session cookie name is not a valid header value"
            ),
        }
    }

    response
}
