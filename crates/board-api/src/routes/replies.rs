//! # Reply Routes
//!
//! Both routes sit behind the login gate. Past it, replies never surface
//! classified failures for bad input: a missing board, an empty comment or
//! someone else's reply ends in a plain redirect. Only an unreadable body
//! raises, as a binding failure on an unmapped path.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::post;
use axum::{Form, Router};
use chrono::Utc;

use crate::error::AppError;
use crate::extractors::extract_form;
use crate::forms::ReplyForm;
use crate::session::{Caller, SessionUser, LOGIN_REQUIRED};
use crate::state::{AppState, ReplyRecord};
use crate::synthesize::LANDING_ROUTE;
use crate::view::redirect;

/// Build the replies router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reply/save", post(save))
        .route("/reply/:id/delete", post(delete))
}

fn detail_route(board_id: i64) -> String {
    format!("/board/detail/{board_id}")
}

/// Where a failed save goes back to. Only a numeric board id is echoed
/// into the `Location` header.
fn return_route(raw_board_id: &str) -> String {
    raw_board_id
        .trim()
        .parse::<i64>()
        .map(detail_route)
        .unwrap_or_else(|_| LANDING_ROUTE.to_string())
}

/// Store a reply. On success returns the board id; otherwise the reason.
fn save_reply(
    state: &AppState,
    form: &ReplyForm,
    user: Option<&SessionUser>,
) -> Result<i64, &'static str> {
    let user = user.ok_or(LOGIN_REQUIRED)?;
    let board_id = form
        .board_id
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|id| state.boards.get(id).is_some())
        .ok_or("게시글 정보가 없습니다.")?;
    if form.comment.trim().is_empty() {
        return Err("댓글 내용을 입력해주세요.");
    }

    let id = state.reply_ids.next();
    state.replies.insert(
        id,
        ReplyRecord {
            id,
            board_id,
            writer_id: user.id,
            comment: form.comment.clone(),
            created_at: Utc::now(),
        },
    );
    Ok(board_id)
}

/// Remove a reply written by `user`. On success returns its board id.
fn delete_reply(
    state: &AppState,
    raw_id: &str,
    user: Option<&SessionUser>,
) -> Result<i64, &'static str> {
    let user = user.ok_or(LOGIN_REQUIRED)?;
    let reply_id: i64 = raw_id.trim().parse().map_err(|_| "잘못된 댓글 ID입니다.")?;
    let reply = state.replies.get(&reply_id).ok_or("댓글을 찾을 수 없습니다.")?;
    if reply.writer_id != user.id {
        return Err("삭제 권한이 없습니다.");
    }
    state.replies.remove(&reply_id);
    Ok(reply.board_id)
}

/// POST /reply/save: back to the board either way.
async fn save(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Form<ReplyForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = extract_form(body)?;
    match save_reply(&state, &form, caller.user.as_ref()) {
        Ok(board_id) => {
            tracing::info!(board_id, "reply saved");
            Ok(redirect(&detail_route(board_id)))
        }
        Err(reason) => {
            tracing::debug!(reason, board_id = ?form.board_id, "reply not saved");
            Ok(redirect(&return_route(&form.board_id)))
        }
    }
}

/// POST /reply/:id/delete
async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(reply_id): Path<String>,
) -> Response {
    match delete_reply(&state, &reply_id, caller.user.as_ref()) {
        Ok(board_id) => {
            tracing::info!(board_id, "reply deleted");
            redirect(&detail_route(board_id))
        }
        Err(reason) => {
            tracing::debug!(reason, reply_id = %reply_id, "reply not deleted");
            redirect(LANDING_ROUTE)
        }
    }
}
