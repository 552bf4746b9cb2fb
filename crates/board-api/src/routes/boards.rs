//! # Board Routes
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | GET  | `/` | listing, consumes the flash message |
//! | GET  | `/board/detail/{id}` | |
//! | GET  | `/board/save-form` | |
//! | GET  | `/board/update-form/{id}` | writer only |
//! | POST | `/board/insert` | guarded, re-renders `board/save-form` |
//! | POST | `/board/{id}/update` | guarded, re-renders `board/update-form` for `boardId` |
//! | POST | `/board/{id}/delete` | writer only |

use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde_json::json;

use crate::embed::embed_youtube;
use crate::error::AppError;
use crate::extractors::Bound;
use crate::forms::BoardForm;
use crate::guard::{run_guarded, GuardPolicy, OperationArgs};
use crate::reconstruct::{BoardDisplay, ReplyDisplay};
use crate::session::{Caller, SessionUser};
use crate::state::{AppState, BoardRecord};
use crate::synthesize::LANDING_ROUTE;
use crate::view::{redirect, View};

pub const BOARD_NOT_FOUND: &str = "게시글을 찾을 수 없습니다.";
const BOARD_ID_BLANK: &str = "잘못된 게시글 ID입니다.";
const BOARD_ID_MALFORMED: &str = "잘못된 게시글 ID 형식입니다.";
const UPDATE_FORBIDDEN: &str = "수정 권한이 없습니다.";
const DELETE_FORBIDDEN: &str = "삭제 권한이 없습니다.";

const INSERT_POLICY: GuardPolicy = GuardPolicy::new(View::BoardSaveForm);
const UPDATE_POLICY: GuardPolicy =
    GuardPolicy::new(View::BoardUpdateForm).with_path_identifier("boardId");

/// Build the boards router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/board/detail/:id", get(detail))
        .route("/board/save-form", get(save_form))
        .route("/board/update-form/:id", get(update_form))
        .route("/board/insert", post(insert))
        .route("/board/:id/update", post(update))
        .route("/board/:id/delete", post(delete))
}

/// Parse a board id from a path segment.
pub fn parse_board_id(raw: &str) -> Result<i64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadIdentifier(BOARD_ID_BLANK.into()));
    }
    raw.parse()
        .map_err(|_| AppError::BadIdentifier(BOARD_ID_MALFORMED.into()))
}

fn find_board(state: &AppState, raw_id: &str) -> Result<BoardRecord, AppError> {
    let id = parse_board_id(raw_id)?;
    state
        .boards
        .get(&id)
        .ok_or_else(|| AppError::NotFound(BOARD_NOT_FOUND.into()))
}

fn require_writer<'a>(
    caller: &'a Caller,
    board: &BoardRecord,
    forbidden: &str,
) -> Result<&'a SessionUser, AppError> {
    let user = caller.require_user()?;
    if user.id != board.writer_id {
        tracing::warn!(board_id = board.id, user_id = user.id, "caller is not the writer");
        return Err(AppError::AccessDenied(forbidden.into()));
    }
    Ok(user)
}

fn replies_for(state: &AppState, board_id: i64, viewer: Option<&SessionUser>) -> Vec<ReplyDisplay> {
    let mut replies = state.replies.list();
    replies.retain(|r| r.board_id == board_id);
    replies.sort_by_key(|r| r.id);
    replies
        .into_iter()
        .map(|r| ReplyDisplay {
            id: r.id,
            reply_writer_name: state
                .users
                .get(&r.writer_id)
                .map(|u| u.user_name)
                .unwrap_or_default(),
            is_reply_writer: viewer.is_some_and(|v| v.id == r.writer_id),
            reply_writer_id: r.writer_id,
            comment: r.comment,
        })
        .collect()
}

fn to_display(
    state: &AppState,
    board: &BoardRecord,
    writer_name: Option<String>,
    viewer: Option<&SessionUser>,
) -> BoardDisplay {
    BoardDisplay {
        id: board.id.to_string(),
        title: Some(board.title.clone()),
        content: Some(board.content.clone()),
        writer_id: Some(board.writer_id),
        writer_name,
        replies: replies_for(state, board.id, viewer),
    }
}

/// GET /: newest boards first.
///
/// A writer name that cannot be resolved is left empty here rather than
/// failing: failures redirect to this page.
async fn index(State(state): State<AppState>, caller: Caller) -> Result<Response, AppError> {
    let global_message = state.flash.channel(caller.session).read_once();

    let mut boards = state.boards.list();
    boards.sort_by(|a, b| b.id.cmp(&a.id));

    let mut models = Vec::with_capacity(boards.len());
    for board in &boards {
        let writer_name = match state.writer_name(board.writer_id).await {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!(board_id = board.id, error = %e, "writer name unavailable");
                None
            }
        };
        models.push(to_display(&state, board, writer_name, caller.user.as_ref()));
    }

    state.render(
        View::Index,
        &json!({
            "models": models,
            "globalMessage": global_message,
            "isLogin": caller.is_signed_in(),
        }),
    )
}

/// GET /board/detail/:id
async fn detail(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let board = find_board(&state, &id)?;
    let writer_name = state.writer_name(board.writer_id).await?;
    let is_modify = caller
        .user
        .as_ref()
        .is_some_and(|u| u.id == board.writer_id);
    let model = to_display(&state, &board, Some(writer_name), caller.user.as_ref());

    state.render(
        View::BoardDetail,
        &json!({
            "model": model,
            "isModify": is_modify,
            "isLogin": caller.is_signed_in(),
        }),
    )
}

/// GET /board/save-form
async fn save_form(State(state): State<AppState>, caller: Caller) -> Result<Response, AppError> {
    state.render(
        View::BoardSaveForm,
        &json!({
            "dto": BoardForm::default(),
            "isLogin": caller.is_signed_in(),
        }),
    )
}

/// GET /board/update-form/:id: writer only.
async fn update_form(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let board = find_board(&state, &id)?;
    let user = require_writer(&caller, &board, UPDATE_FORBIDDEN)?;
    let model = to_display(&state, &board, Some(user.user_name.clone()), Some(user));
    let dto = BoardForm {
        title: board.title.clone(),
        content: board.content.clone(),
    };

    state.render(
        View::BoardUpdateForm,
        &json!({
            "model": model,
            "dto": dto,
            "isLogin": true,
        }),
    )
}

/// POST /board/insert
async fn insert(
    State(state): State<AppState>,
    caller: Caller,
    bound: Bound<BoardForm>,
) -> Result<Response, AppError> {
    run_guarded(&INSERT_POLICY, bound, &OperationArgs::new(), move |form| async move {
        let user = caller.require_user()?;
        let now = Utc::now();
        let id = state.board_ids.next();
        state.boards.insert(
            id,
            BoardRecord {
                id,
                title: form.title,
                content: embed_youtube(&form.content),
                writer_id: user.id,
                created_at: now,
                updated_at: now,
            },
        );
        tracing::info!(board_id = id, writer_id = user.id, "board created");
        Ok(redirect(LANDING_ROUTE))
    })
    .await
}

/// POST /board/:id/update
async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(board_id): Path<String>,
    bound: Bound<BoardForm>,
) -> Result<Response, AppError> {
    let args = OperationArgs::new().with("boardId", Some(&board_id));
    run_guarded(&UPDATE_POLICY, bound, &args, move |form| async move {
        let board = find_board(&state, &board_id)?;
        require_writer(&caller, &board, UPDATE_FORBIDDEN)?;
        let content = embed_youtube(&form.content);
        state.boards.update(&board.id, |b| {
            b.title = form.title;
            b.content = content;
            b.updated_at = Utc::now();
        });
        tracing::info!(board_id = board.id, "board updated");
        Ok(redirect(&format!("/board/detail/{}", board.id)))
    })
    .await
}

/// POST /board/:id/delete: removes the board and its replies.
async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(board_id): Path<String>,
) -> Result<Response, AppError> {
    let board = find_board(&state, &board_id)?;
    require_writer(&caller, &board, DELETE_FORBIDDEN)?;
    state.boards.remove(&board.id);
    let replies = state.replies.remove_where(|r| r.board_id == board.id);
    tracing::info!(board_id = board.id, replies, "board deleted");
    Ok(redirect(LANDING_ROUTE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_board_id_classifies() {
        assert_eq!(parse_board_id("42").unwrap(), 42);
        assert_eq!(parse_board_id(" 7 ").unwrap(), 7);
        match parse_board_id("") {
            Err(AppError::BadIdentifier(m)) => assert_eq!(m, BOARD_ID_BLANK),
            other => panic!("expected BadIdentifier, got {other:?}"),
        }
        match parse_board_id("abc") {
            Err(AppError::BadIdentifier(m)) => assert_eq!(m, BOARD_ID_MALFORMED),
            other => panic!("expected BadIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn missing_board_is_not_found() {
        let state = AppState::new();
        match find_board(&state, "999") {
            Err(AppError::NotFound(m)) => assert_eq!(m, BOARD_NOT_FOUND),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
