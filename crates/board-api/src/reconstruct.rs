//! # View-Model Reconstruction
//!
//! When an update form fails validation, the page needs a board model to
//! render against, but the operation never ran and the stored record may
//! not even be readable. [`reconstruct`] builds that model from the path
//! identifier and the submitted input alone. Everything the pipeline cannot
//! know (writer, replies) is left empty. No store is consulted.

use serde::Serialize;

use crate::forms::FormInput;

/// One reply as shown under a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyDisplay {
    pub id: i64,
    pub comment: String,
    pub reply_writer_id: i64,
    pub reply_writer_name: String,
    pub is_reply_writer: bool,
}

/// A board as shown on the detail and form pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDisplay {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub writer_id: Option<i64>,
    pub writer_name: Option<String>,
    pub replies: Vec<ReplyDisplay>,
}

/// Build a display model for the board at `path_identifier` from the
/// submitted input. Input that is not a board form leaves title and
/// content empty.
pub fn reconstruct(path_identifier: &str, submitted: Option<&FormInput>) -> BoardDisplay {
    let board = submitted.and_then(FormInput::as_board);
    BoardDisplay {
        id: path_identifier.to_string(),
        title: board.map(|b| b.title.clone()),
        content: board.map(|b| b.content.clone()),
        writer_id: None,
        writer_name: None,
        replies: Vec::new(),
    }
}
