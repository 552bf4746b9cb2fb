//! # API Error Types
//!
//! [`AppError`] is the single error type every handler returns. Each
//! variant except [`AppError::Internal`] is classified into exactly one
//! [`FailureKind`] at the point it is raised.
//!
//! `AppError` does not decide what the client sees. Its `IntoResponse`
//! parks the error in the response extensions, and the failure boundary
//! middleware (see [`crate::middleware::boundary`]) replaces that response
//! with the one the synthesizer picks for the request's content preference
//! and path. The placeholder response is a structured envelope, so the
//! error still reads sensibly on a router mounted without the boundary.

use axum::response::{IntoResponse, Response};
use board_core::{join_field_errors, FailureKind, FieldError, ValidationFailure};
use board_user_client::UserClientError;
use thiserror::Error;

use crate::context::ErrorContext;
use crate::forms::FormInput;
use crate::synthesize::ErrorEnvelope;

/// Application-level error type.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Guard-raised validation failure with a full error context.
    #[error("validation failed: {}", .0.failure().message())]
    Validation(Box<ErrorContext>),

    /// Framework-level binding failure. Carries no context; the view is
    /// inferred from the request path.
    #[error("binding failed: {}", join_field_errors(.fields))]
    Binding {
        fields: Vec<FieldError>,
        input: Option<FormInput>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("bad identifier: {0}")]
    BadIdentifier(String),

    #[error("upstream client error: {0}")]
    UpstreamClient(String),

    #[error("upstream server error: {0}")]
    UpstreamServer(String),

    #[error("duplicate resource: {0}")]
    DuplicateResource(String),

    /// Login failed. `input` is the submitted form with the password removed.
    #[error("bad credentials: {message}")]
    BadCredentials {
        message: String,
        input: Option<FormInput>,
    },

    /// Unclassified failure. The detail is logged, never shown.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Marker carrying a raised error from handler to boundary.
#[derive(Debug, Clone)]
pub struct Raised(pub AppError);

impl AppError {
    /// The failure kind, or `None` for unclassified errors.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Validation(_) | Self::Binding { .. } => Some(FailureKind::Validation),
            Self::NotFound(_) => Some(FailureKind::NotFound),
            Self::AccessDenied(_) => Some(FailureKind::AccessDenied),
            Self::BadIdentifier(_) => Some(FailureKind::BadIdentifier),
            Self::UpstreamClient(_) => Some(FailureKind::UpstreamClientError),
            Self::UpstreamServer(_) => Some(FailureKind::UpstreamServerError),
            Self::DuplicateResource(_) => Some(FailureKind::DuplicateResource),
            Self::BadCredentials { .. } => Some(FailureKind::BadCredentials),
            Self::Internal(_) => None,
        }
    }

    /// The classified failure this error carries, or `None` when unclassified.
    pub fn failure(&self) -> Option<ValidationFailure> {
        let simple = |kind, message: &String| Some(ValidationFailure::simple(kind, message.clone()));
        match self {
            Self::Validation(ctx) => Some(ctx.failure().clone()),
            Self::Binding { fields, .. } => Some(ValidationFailure::from_fields(fields.clone())),
            Self::NotFound(m) => simple(FailureKind::NotFound, m),
            Self::AccessDenied(m) => simple(FailureKind::AccessDenied, m),
            Self::BadIdentifier(m) => simple(FailureKind::BadIdentifier, m),
            Self::UpstreamClient(m) => simple(FailureKind::UpstreamClientError, m),
            Self::UpstreamServer(m) => simple(FailureKind::UpstreamServerError, m),
            Self::DuplicateResource(m) => simple(FailureKind::DuplicateResource, m),
            Self::BadCredentials { message, .. } => simple(FailureKind::BadCredentials, message),
            Self::Internal(_) => None,
        }
    }

    /// A binding failure for a body that could not be deserialized at all.
    pub fn unreadable_body(rejection: impl Into<String>) -> Self {
        Self::Binding {
            fields: vec![FieldError::new("body", rejection)],
            input: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = ErrorEnvelope::for_error(&self).into_response();
        response.extensions_mut().insert(Raised(self));
        response
    }
}

/// Upstream 4xx answers become client errors; 5xx, transport, and decode
/// failures become server errors.
impl From<UserClientError> for AppError {
    fn from(err: UserClientError) -> Self {
        match (&err, err.status()) {
            (UserClientError::ClientStatus { .. }, Some(status)) => {
                let status = axum::http::StatusCode::from_u16(status)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| status.to_string());
                Self::UpstreamClient(format!("Client error: {status}"))
            }
            _ => {
                tracing::error!(error = %err, "user API failure");
                Self::UpstreamServer("External Server Error occurred".into())
            }
        }
    }
}
