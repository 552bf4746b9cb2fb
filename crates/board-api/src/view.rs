//! # Views
//!
//! The closed set of page templates the application renders, and the
//! [`ViewRenderer`] seam that turns a view id plus a JSON model into HTML.
//!
//! The default [`ModelRenderer`] does not template anything: it emits a
//! minimal page that names the view and embeds the model as JSON, which is
//! enough for a browser-side template layer or for tests to read back.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A renderable page template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Index,
    BoardDetail,
    BoardSaveForm,
    BoardUpdateForm,
    UserJoinForm,
    UserLoginForm,
}

impl View {
    /// The template path this view is known by.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::BoardDetail => "board/detail",
            Self::BoardSaveForm => "board/save-form",
            Self::BoardUpdateForm => "board/update-form",
            Self::UserJoinForm => "user/join-form",
            Self::UserLoginForm => "user/login-form",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to encode model for view {view}: {source}")]
    Encode {
        view: &'static str,
        source: serde_json::Error,
    },
}

/// Turns a view and its model into an HTML document.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: View, model: &serde_json::Value) -> Result<String, RenderError>;
}

/// Renders a bare page carrying the view id and the JSON-encoded model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRenderer;

impl ViewRenderer for ModelRenderer {
    fn render(&self, view: View, model: &serde_json::Value) -> Result<String, RenderError> {
        let json = serde_json::to_string(model).map_err(|source| RenderError::Encode {
            view: view.as_str(),
            source,
        })?;
        // A literal "</" would close the script element early.
        let json = json.replace("</", "<\\/");
        Ok(format!(
            "<!DOCTYPE html>\n<html data-view=\"{view}\">\n<head><meta charset=\"utf-8\"><title>{view}</title></head>\n<body>\n<script type=\"application/json\" id=\"model\">{json}</script>\n</body>\n</html>\n"
        ))
    }
}

/// A 302 redirect to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
