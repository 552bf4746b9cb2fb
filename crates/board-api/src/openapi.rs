//! # OpenAPI Specification Assembly
//!
//! Documents the machine-facing surface: the user info lookup and the
//! structured error envelope every failure answers with when the client
//! does not ask for HTML. Served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Board API",
        version = "0.4.0",
        description = "Board, reply, and user routes with a shared failure-to-response pipeline.",
        license(name = "BUSL-1.1")
    ),
    paths(crate::routes::users::user_info),
    components(schemas(
        crate::synthesize::ErrorEnvelope,
        crate::routes::users::UserInfoResponse,
    )),
    tags((name = "users", description = "User lookup API"))
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_documents_user_info_and_envelope() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(spec["paths"].get("/api/user/info").is_some());
        assert!(spec["components"]["schemas"].get("ErrorEnvelope").is_some());
    }
}
