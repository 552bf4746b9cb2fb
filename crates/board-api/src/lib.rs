//! # board-api — Board Web Application
//!
//! A board/reply/user CRUD application whose failures all flow through one
//! interception pipeline. Handlers return `Result<_, AppError>`; every
//! classified error is turned into either a structured `{status, body}`
//! envelope, a re-rendered form, or a redirect carrying a one-time flash
//! message, depending on what the client accepts and where it was.
//!
//! ## Pipeline
//!
//! ```text
//! extractor (Bound / Valid) → guard → handler
//!        │                     │        │
//!        └────── AppError ─────┴────────┘
//!                    │
//!        failure boundary → synthesize → envelope | render | redirect+flash
//! ```
//!
//! ## Routes
//!
//! | Prefix | Module |
//! |--------|--------|
//! | `/`, `/board/*` | [`routes::boards`] |
//! | `/reply/*` | [`routes::replies`] |
//! | `/join*`, `/login*`, `/logout`, `/api/user/info` | [`routes::users`] |
//! | `/openapi.json` | [`openapi`] |
//! | `/health/*` | probes, outside the boundary |
//!
//! Everything else requires a signed-in session except the paths listed in
//! [`middleware::login_gate`].
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → FailureBoundary → LoginGate → Handler
//! ```

pub mod context;
pub mod credentials;
pub mod embed;
pub mod error;
pub mod extractors;
pub mod flash;
pub mod forms;
pub mod guard;
pub mod middleware;
pub mod negotiation;
pub mod openapi;
pub mod patterns;
pub mod reconstruct;
pub mod routes;
pub mod session;
pub mod state;
pub mod synthesize;
pub mod view;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the failure boundary so
/// they never mint sessions.
pub fn app(state: AppState) -> Router {
    let pages = Router::new()
        .merge(routes::boards::router())
        .merge(routes::replies::router())
        .merge(routes::users::router())
        .merge(openapi::router())
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::login_gate::require_login,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::boundary::failure_boundary,
        ))
        .layer(middleware::tracing_layer::layer())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(pages)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
