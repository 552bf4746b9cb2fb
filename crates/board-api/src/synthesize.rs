//! # Response Synthesis
//!
//! Turns a raised [`AppError`] into the response the client sees. The
//! decision depends only on the error, the request's content preference,
//! and its path:
//!
//! | Preference | Error | Response |
//! |------------|-------|----------|
//! | structured data | any classified | `{status, body}` envelope, kind's default status |
//! | HTML | guard validation | re-render the context's view with input and reconstructed model |
//! | HTML | binding | re-render the view inferred from the path, or redirect `/` with a generic flash |
//! | HTML | bad credentials | re-render the login form with the input |
//! | HTML | any other kind | redirect `/` with the message in flash |
//! | any | unclassified | 500 envelope with a generic message |
//!
//! Every user-facing message starts with [`MESSAGE_PREFIX`].

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use board_core::{join_field_errors, FieldError};
use serde::Serialize;
use utoipa::ToSchema;

use crate::context::ErrorContext;
use crate::error::AppError;
use crate::flash::FlashChannel;
use crate::forms::{BoardForm, FormInput};
use crate::negotiation::ContentPreference;
use crate::patterns;
use crate::reconstruct::{reconstruct, BoardDisplay};
use crate::view::{redirect, View, ViewRenderer};

pub const MESSAGE_PREFIX: &str = "Warning: ";
pub const LANDING_ROUTE: &str = "/";
const UNMAPPED_FORM_MESSAGE: &str = "입력값을 확인해주세요.";
const INTERNAL_MESSAGE: &str = "내부 오류가 발생했습니다.";

fn warn(message: &str) -> String {
    format!("{MESSAGE_PREFIX}{message}")
}

// -- Envelope -------------------------------------------------------------------

/// Structured error body returned to clients that do not ask for HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    /// HTTP status, repeated in the body.
    pub status: u16,
    /// User-facing message, prefixed with `"Warning: "`.
    pub body: String,
}

impl ErrorEnvelope {
    /// The envelope for `error`, independent of preference.
    pub fn for_error(error: &AppError) -> Self {
        match (error.kind(), error.failure()) {
            (Some(kind), Some(failure)) => Self {
                status: kind.default_status(),
                body: warn(&failure.summary()),
            },
            _ => Self::internal(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            body: warn(INTERNAL_MESSAGE),
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

// -- View inference ---------------------------------------------------------------

/// A path rule for binding failures: paths containing `marker` re-render
/// `view`, or `alternate` when the path also contains its sub-marker.
struct ViewRule {
    marker: &'static str,
    view: View,
    alternate: Option<(&'static str, View)>,
    extracts_identifier: bool,
}

const VIEW_RULES: &[ViewRule] = &[
    ViewRule {
        marker: "/board/",
        view: View::BoardSaveForm,
        alternate: Some(("/update", View::BoardUpdateForm)),
        extracts_identifier: true,
    },
    ViewRule {
        marker: "/join",
        view: View::UserJoinForm,
        alternate: None,
        extracts_identifier: false,
    },
    ViewRule {
        marker: "/login",
        view: View::UserLoginForm,
        alternate: None,
        extracts_identifier: false,
    },
];

/// The view a binding failure on `path` re-renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredView {
    pub view: View,
    pub path_identifier: Option<String>,
}

/// Infer the form view for a request path. `None` for unmapped paths.
pub fn infer_view(path: &str) -> Option<InferredView> {
    let rule = VIEW_RULES.iter().find(|r| path.contains(r.marker))?;
    let view = match rule.alternate {
        Some((sub, alternate)) if path.contains(sub) => alternate,
        _ => rule.view,
    };
    let path_identifier = if rule.extracts_identifier {
        patterns::board_update_path()
            .and_then(|re| re.captures(path))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    } else {
        None
    };
    Some(InferredView {
        view,
        path_identifier,
    })
}

// -- Synthesized responses --------------------------------------------------------

/// Model handed to a re-rendered form view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormViewModel {
    pub global_message: String,
    pub dto: Option<FormInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<BoardDisplay>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub status: StatusCode,
    pub view: View,
    pub model: FormViewModel,
}

/// What the boundary sends back for a raised error.
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesized {
    Envelope(ErrorEnvelope),
    Render(Rendered),
    /// The flash message has already been written when this is returned.
    Redirect { location: String, flash: String },
}

impl Synthesized {
    pub fn into_response(self, renderer: &dyn ViewRenderer) -> Response {
        match self {
            Self::Envelope(envelope) => envelope.into_response(),
            Self::Redirect { location, .. } => redirect(&location),
            Self::Render(rendered) => {
                let html = serde_json::to_value(&rendered.model)
                    .map_err(|e| e.to_string())
                    .and_then(|model| {
                        renderer
                            .render(rendered.view, &model)
                            .map_err(|e| e.to_string())
                    });
                match html {
                    Ok(html) => (rendered.status, Html(html)).into_response(),
                    Err(e) => {
                        tracing::error!(view = %rendered.view, error = %e, "failed to render error view");
                        ErrorEnvelope::internal().into_response()
                    }
                }
            }
        }
    }
}

/// What the synthesizer knows about the request.
#[derive(Debug, Clone)]
pub struct RequestFacts {
    pub preference: ContentPreference,
    pub path: String,
}

/// Pick the response for `error`.
///
/// The only side effect is a flash write on the redirect outcomes.
pub fn synthesize(error: AppError, facts: &RequestFacts, flash: &FlashChannel<'_>) -> Synthesized {
    let Some(kind) = error.kind() else {
        tracing::error!(error = %error, path = %facts.path, "unclassified failure");
        return Synthesized::Envelope(ErrorEnvelope::internal());
    };

    tracing::warn!(kind = %kind, path = %facts.path, error = %error, "request failed");

    match facts.preference {
        ContentPreference::StructuredData => Synthesized::Envelope(ErrorEnvelope::for_error(&error)),
        ContentPreference::Html => synthesize_html(error, facts, flash),
    }
}

fn synthesize_html(error: AppError, facts: &RequestFacts, flash: &FlashChannel<'_>) -> Synthesized {
    match error {
        AppError::Validation(context) => rerender_context(*context),
        AppError::Binding { fields, input } => rerender_inferred(&fields, input, &facts.path, flash),
        AppError::BadCredentials { message, input } => Synthesized::Render(Rendered {
            status: StatusCode::OK,
            view: View::UserLoginForm,
            model: FormViewModel {
                global_message: warn(&message),
                dto: input,
                model: None,
            },
        }),
        AppError::NotFound(message)
        | AppError::AccessDenied(message)
        | AppError::BadIdentifier(message)
        | AppError::UpstreamClient(message)
        | AppError::UpstreamServer(message)
        | AppError::DuplicateResource(message) => redirect_with_flash(flash, warn(&message)),
        AppError::Internal(_) => Synthesized::Envelope(ErrorEnvelope::internal()),
    }
}

fn rerender_context(context: ErrorContext) -> Synthesized {
    let model = context
        .path_identifier()
        .map(|id| reconstruct(id, context.submitted_input()));
    Synthesized::Render(Rendered {
        status: StatusCode::OK,
        view: context.target_view(),
        model: FormViewModel {
            global_message: warn(&context.failure().summary()),
            dto: context.submitted_input().cloned(),
            model,
        },
    })
}

fn rerender_inferred(
    fields: &[FieldError],
    input: Option<FormInput>,
    path: &str,
    flash: &FlashChannel<'_>,
) -> Synthesized {
    let Some(inferred) = infer_view(path) else {
        return redirect_with_flash(flash, warn(UNMAPPED_FORM_MESSAGE));
    };

    // Board forms always get a dto to bind against, even when the body
    // never deserialized.
    let dto = match inferred.view {
        View::BoardSaveForm | View::BoardUpdateForm => {
            input.or_else(|| Some(FormInput::Board(BoardForm::default())))
        }
        _ => input,
    };
    let model = inferred
        .path_identifier
        .as_deref()
        .map(|id| reconstruct(id, dto.as_ref()));

    Synthesized::Render(Rendered {
        status: StatusCode::OK,
        view: inferred.view,
        model: FormViewModel {
            global_message: warn(&join_field_errors(fields)),
            dto,
            model,
        },
    })
}

fn redirect_with_flash(flash: &FlashChannel<'_>, message: String) -> Synthesized {
    flash.write(message.clone());
    Synthesized::Redirect {
        location: LANDING_ROUTE.to_string(),
        flash: message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::FlashStore;
    use crate::forms::LoginForm;
    use crate::session::SessionId;
    use board_core::ValidationFailure;
    use std::time::Duration;
    use uuid::Uuid;

    fn facts(preference: ContentPreference, path: &str) -> RequestFacts {
        RequestFacts {
            preference,
            path: path.to_string(),
        }
    }

    fn html(path: &str) -> RequestFacts {
        facts(ContentPreference::Html, path)
    }

    fn store() -> (FlashStore, SessionId) {
        (FlashStore::new(Duration::from_secs(60)), SessionId(Uuid::new_v4()))
    }

    fn title_required() -> Vec<FieldError> {
        vec![FieldError::new("title", "제목은 필수입니다.")]
    }

    #[test]
    fn structured_validation_envelope() {
        let (store, sid) = store();
        let flash = store.channel(sid);
        let err = AppError::Binding {
            fields: title_required(),
            input: None,
        };
        let out = synthesize(err, &facts(ContentPreference::StructuredData, "/board/insert"), &flash);
        assert_eq!(
            out,
            Synthesized::Envelope(ErrorEnvelope {
                status: 400,
                body: "Warning: title: 제목은 필수입니다.".into(),
            })
        );
        assert_eq!(flash.read_once(), None);
    }

    #[test]
    fn structured_duplicate_envelope() {
        let (store, sid) = store();
        let err = AppError::DuplicateResource("이미 존재하는 사용자입니다.".into());
        let out = synthesize(
            err,
            &facts(ContentPreference::StructuredData, "/join"),
            &store.channel(sid),
        );
        assert_eq!(
            out,
            Synthesized::Envelope(ErrorEnvelope {
                status: 409,
                body: "Warning: 이미 존재하는 사용자입니다.".into(),
            })
        );
    }

    #[test]
    fn html_not_found_redirects_with_flash() {
        let (store, sid) = store();
        let flash = store.channel(sid);
        let out = synthesize(
            AppError::NotFound("게시글을 찾을 수 없습니다.".into()),
            &html("/board/detail/999"),
            &flash,
        );
        assert_eq!(
            out,
            Synthesized::Redirect {
                location: "/".into(),
                flash: "Warning: 게시글을 찾을 수 없습니다.".into(),
            }
        );
        assert_eq!(
            flash.read_once().as_deref(),
            Some("Warning: 게시글을 찾을 수 없습니다.")
        );
    }

    #[test]
    fn html_guard_failure_reconstructs_model() {
        let (store, sid) = store();
        let input = BoardForm {
            title: String::new(),
            content: "x".into(),
        };
        let ctx = ErrorContext::builder(
            ValidationFailure::from_fields(title_required()),
            View::BoardUpdateForm,
        )
        .submitted_input(input.clone())
        .path_identifier(Some("42".into()))
        .build();

        let Synthesized::Render(rendered) = synthesize(
            AppError::Validation(Box::new(ctx)),
            &html("/board/42/update"),
            &store.channel(sid),
        ) else {
            panic!("expected Render");
        };
        assert_eq!(rendered.view, View::BoardUpdateForm);
        assert_eq!(rendered.model.global_message, "Warning: title: 제목은 필수입니다.");
        assert_eq!(rendered.model.dto, Some(FormInput::Board(input)));
        let model = rendered.model.model.unwrap();
        assert_eq!(model.id, "42");
        assert_eq!(model.title.as_deref(), Some(""));
        assert_eq!(model.content.as_deref(), Some("x"));
        assert_eq!(model.writer_id, None);
        assert!(model.replies.is_empty());
    }

    #[test]
    fn html_guard_failure_without_identifier_has_no_model() {
        let (store, sid) = store();
        let ctx = ErrorContext::builder(
            ValidationFailure::from_fields(title_required()),
            View::BoardSaveForm,
        )
        .submitted_input(BoardForm::default())
        .build();
        let Synthesized::Render(rendered) = synthesize(
            AppError::Validation(Box::new(ctx)),
            &html("/board/insert"),
            &store.channel(sid),
        ) else {
            panic!("expected Render");
        };
        assert_eq!(rendered.view, View::BoardSaveForm);
        assert!(rendered.model.model.is_none());
    }

    #[test]
    fn binding_failure_infers_update_view_and_identifier() {
        let (store, sid) = store();
        let Synthesized::Render(rendered) = synthesize(
            AppError::Binding {
                fields: title_required(),
                input: None,
            },
            &html("/board/7/update"),
            &store.channel(sid),
        ) else {
            panic!("expected Render");
        };
        assert_eq!(rendered.view, View::BoardUpdateForm);
        assert_eq!(rendered.model.dto, Some(FormInput::Board(BoardForm::default())));
        assert_eq!(rendered.model.model.map(|m| m.id).as_deref(), Some("7"));
    }

    #[test]
    fn binding_failure_on_unmapped_path_redirects() {
        let (store, sid) = store();
        let flash = store.channel(sid);
        let out = synthesize(
            AppError::Binding {
                fields: title_required(),
                input: None,
            },
            &html("/reply/save"),
            &flash,
        );
        assert_eq!(
            out,
            Synthesized::Redirect {
                location: "/".into(),
                flash: "Warning: 입력값을 확인해주세요.".into(),
            }
        );
        assert_eq!(flash.read_once().as_deref(), Some("Warning: 입력값을 확인해주세요."));
    }

    #[test]
    fn bad_credentials_renders_login_form() {
        let (store, sid) = store();
        let input = FormInput::Login(LoginForm {
            username: "kim".into(),
            password: String::new(),
        });
        let Synthesized::Render(rendered) = synthesize(
            AppError::BadCredentials {
                message: "아이디 또는 비밀번호가 올바르지 않습니다.".into(),
                input: Some(input.clone()),
            },
            &html("/login"),
            &store.channel(sid),
        ) else {
            panic!("expected Render");
        };
        assert_eq!(rendered.view, View::UserLoginForm);
        assert_eq!(
            rendered.model.global_message,
            "Warning: 아이디 또는 비밀번호가 올바르지 않습니다."
        );
        assert_eq!(rendered.model.dto, Some(input));
    }

    #[test]
    fn unclassified_is_500_for_every_preference() {
        for preference in [ContentPreference::Html, ContentPreference::StructuredData] {
            let (store, sid) = store();
            let flash = store.channel(sid);
            let out = synthesize(
                AppError::Internal("db down".into()),
                &facts(preference, "/board/insert"),
                &flash,
            );
            let Synthesized::Envelope(envelope) = out else {
                panic!("expected Envelope");
            };
            assert_eq!(envelope.status, 500);
            assert!(!envelope.body.contains("db down"));
            assert_eq!(flash.read_once(), None);
        }
    }

    #[test]
    fn infer_view_rules() {
        let save = infer_view("/board/insert").unwrap();
        assert_eq!(save.view, View::BoardSaveForm);
        assert_eq!(save.path_identifier, None);

        let update = infer_view("/board/12/update").unwrap();
        assert_eq!(update.view, View::BoardUpdateForm);
        assert_eq!(update.path_identifier.as_deref(), Some("12"));

        assert_eq!(infer_view("/join").unwrap().view, View::UserJoinForm);
        assert_eq!(infer_view("/login").unwrap().view, View::UserLoginForm);
        assert_eq!(infer_view("/reply/save"), None);
        assert_eq!(infer_view("/"), None);
    }

    #[test]
    fn form_view_model_serializes_camel_case() {
        let model = FormViewModel {
            global_message: "Warning: x".into(),
            dto: None,
            model: None,
        };
        let value = serde_json::to_value(model).unwrap();
        assert_eq!(value["globalMessage"], "Warning: x");
        assert!(value.get("model").is_none());
    }
}
