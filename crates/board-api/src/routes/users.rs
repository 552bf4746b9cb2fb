//! # User Routes
//!
//! Join, login, logout, and the user info lookup.
//!
//! `/join` binds through [`Valid`], so its field errors take the binding
//! path and the view is inferred from the URL. `/login` is guarded, and a
//! failed login raises `BadCredentials` carrying the submitted username.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::credentials::PasswordDigest;
use crate::error::AppError;
use crate::extractors::{Bound, Valid};
use crate::forms::{JoinForm, LoginForm};
use crate::guard::{run_guarded, GuardPolicy, OperationArgs};
use crate::session::{sign_in, sign_out, Caller, SessionUser};
use crate::state::{AppState, UserRecord};
use crate::synthesize::LANDING_ROUTE;
use crate::view::{redirect, View};

pub const USER_NOT_FOUND: &str = "사용자를 찾을 수 없습니다.";
const USER_ID_MALFORMED: &str = "잘못된 사용자 ID입니다.";
const DUPLICATE_USER: &str = "이미 존재하는 사용자입니다.";
const BAD_CREDENTIALS: &str = "아이디 또는 비밀번호가 올바르지 않습니다.";

const LOGIN_POLICY: GuardPolicy = GuardPolicy::new(View::UserLoginForm);

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/join-form", get(join_form))
        .route("/login-form", get(login_form))
        .route("/join", post(join))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/api/user/info", get(user_info))
}

async fn join_form(State(state): State<AppState>) -> Result<Response, AppError> {
    state.render(View::UserJoinForm, &json!({ "dto": JoinForm::default() }))
}

async fn login_form(State(state): State<AppState>) -> Result<Response, AppError> {
    state.render(View::UserLoginForm, &json!({ "dto": LoginForm::default() }))
}

/// POST /join: register, then send the user to the login form.
async fn join(
    State(state): State<AppState>,
    Valid(form): Valid<JoinForm>,
) -> Result<Response, AppError> {
    let user_name = form.username.trim().to_string();
    let id = state.user_ids.next();
    let record = UserRecord {
        id,
        user_name: user_name.clone(),
        email: form.email.trim().to_string(),
        password: PasswordDigest::new(&form.password),
        created_at: Utc::now(),
    };
    if !state
        .users
        .insert_unless(id, record, |u| u.user_name == user_name)
    {
        return Err(AppError::DuplicateResource(DUPLICATE_USER.into()));
    }
    tracing::info!(user_id = id, "user joined");
    Ok(redirect("/login-form"))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    caller: Caller,
    bound: Bound<LoginForm>,
) -> Result<Response, AppError> {
    run_guarded(&LOGIN_POLICY, bound, &OperationArgs::new(), move |form| async move {
        let username = form.username.trim();
        let user = state
            .users
            .find(|u| u.user_name == username)
            .filter(|u| u.password.matches(&form.password))
            .ok_or_else(|| AppError::BadCredentials {
                message: BAD_CREDENTIALS.into(),
                input: Some(form.without_password().into()),
            })?;

        sign_in(
            &state,
            caller.session,
            SessionUser {
                id: user.id,
                user_name: user.user_name,
                email: user.email,
            },
        );
        tracing::info!(user_id = user.id, "user signed in");
        Ok(redirect(LANDING_ROUTE))
    })
    .await
}

/// GET /logout
async fn logout(State(state): State<AppState>, caller: Caller) -> Response {
    sign_out(&state, caller.session);
    redirect(LANDING_ROUTE)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserInfoQuery {
    /// Id of the user to look up.
    #[serde(rename = "writerId")]
    pub writer_id: String,
}

/// Public identity of a user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserInfoResponse {
    pub id: i64,
    pub name: String,
}

/// GET /api/user/info: id and display name of a user.
#[utoipa::path(
    get,
    path = "/api/user/info",
    params(UserInfoQuery),
    responses(
        (status = 200, description = "User found", body = UserInfoResponse),
        (status = 400, description = "Malformed writer id", body = crate::synthesize::ErrorEnvelope),
        (status = 404, description = "User not found", body = crate::synthesize::ErrorEnvelope),
    ),
    tag = "users"
)]
pub async fn user_info(
    State(state): State<AppState>,
    query: Result<Query<UserInfoQuery>, QueryRejection>,
) -> Result<Json<UserInfoResponse>, AppError> {
    let Query(query) = query.map_err(|e| {
        tracing::debug!(error = %e, "unreadable user info query");
        AppError::BadIdentifier(USER_ID_MALFORMED.into())
    })?;
    let id: i64 = query
        .writer_id
        .trim()
        .parse()
        .map_err(|_| AppError::BadIdentifier(USER_ID_MALFORMED.into()))?;

    let user = state
        .users
        .get(&id)
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;
    Ok(Json(UserInfoResponse {
        id: user.id,
        name: user.user_name,
    }))
}
