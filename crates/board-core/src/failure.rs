//! # Failure Taxonomy — Single Source of Truth
//!
//! Defines the closed [`FailureKind`] enumeration. Every failure raised
//! anywhere in the application is classified into exactly one of these
//! eight kinds before it leaves its origin. Every `match` on `FailureKind`
//! is exhaustive, so adding a kind forces both a status mapping and a
//! synthesis rule to be written.
//!
//! | Kind | Default status | Carries field errors |
//! |------|----------------|----------------------|
//! | Validation | 400 | yes |
//! | NotFound | 404 | no |
//! | AccessDenied | 403 | no |
//! | BadIdentifier | 400 | no |
//! | UpstreamClientError | 400 | no |
//! | UpstreamServerError | 400 | no |
//! | DuplicateResource | 409 | no |
//! | BadCredentials | 401 | no |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of failure kinds the response pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Submitted form input failed field-level validation.
    Validation,
    /// The addressed resource does not exist.
    NotFound,
    /// The caller is not allowed to perform the operation.
    AccessDenied,
    /// A resource identifier was blank or malformed.
    BadIdentifier,
    /// The upstream user service answered with a 4xx status.
    UpstreamClientError,
    /// The upstream user service answered with a 5xx status or was unreachable.
    UpstreamServerError,
    /// A resource with the same natural key already exists.
    DuplicateResource,
    /// Login credentials did not match.
    BadCredentials,
}

impl FailureKind {
    /// Returns the snake_case identifier for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::AccessDenied => "access_denied",
            Self::BadIdentifier => "bad_identifier",
            Self::UpstreamClientError => "upstream_client_error",
            Self::UpstreamServerError => "upstream_server_error",
            Self::DuplicateResource => "duplicate_resource",
            Self::BadCredentials => "bad_credentials",
        }
    }

    /// Default HTTP status code for this kind.
    ///
    /// Upstream failures of either class surface as 400 to the caller: the
    /// caller's request could not be completed as submitted.
    pub fn default_status(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::AccessDenied => 403,
            Self::BadIdentifier => 400,
            Self::UpstreamClientError => 400,
            Self::UpstreamServerError => 400,
            Self::DuplicateResource => 409,
            Self::BadCredentials => 401,
        }
    }

    /// Whether failures of this kind carry a field-level error list.
    pub fn carries_field_errors(&self) -> bool {
        matches!(self, Self::Validation)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Field errors -------------------------------------------------------------

/// One field-level validation error. Display order is declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Join field errors as `"field: message"` pairs separated by `"; "`.
pub fn join_field_errors(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// -- Validation failure -------------------------------------------------------

/// A classified failure: its kind, the field errors (empty for every kind
/// except [`FailureKind::Validation`]), and a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ValidationFailure {
    kind: FailureKind,
    fields: Vec<FieldError>,
    message: String,
}

impl ValidationFailure {
    /// A failure that carries only a message.
    ///
    /// Used for every kind other than `Validation`; the field list is empty.
    pub fn simple(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            message: message.into(),
        }
    }

    /// A `Validation` failure built from field errors. The message is the
    /// joined field list.
    pub fn from_fields(fields: Vec<FieldError>) -> Self {
        let message = join_field_errors(&fields);
        Self {
            kind: FailureKind::Validation,
            fields,
            message,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The user-facing summary without the warning marker.
    ///
    /// Field-carrying kinds summarise as the joined field list; every other
    /// kind summarises as its message.
    pub fn summary(&self) -> String {
        if self.kind.carries_field_errors() {
            join_field_errors(&self.fields)
        } else {
            self.message.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [FailureKind; 8] = [
        FailureKind::Validation,
        FailureKind::NotFound,
        FailureKind::AccessDenied,
        FailureKind::BadIdentifier,
        FailureKind::UpstreamClientError,
        FailureKind::UpstreamServerError,
        FailureKind::DuplicateResource,
        FailureKind::BadCredentials,
    ];

    #[test]
    fn default_statuses_match_table() {
        assert_eq!(FailureKind::Validation.default_status(), 400);
        assert_eq!(FailureKind::NotFound.default_status(), 404);
        assert_eq!(FailureKind::AccessDenied.default_status(), 403);
        assert_eq!(FailureKind::BadIdentifier.default_status(), 400);
        assert_eq!(FailureKind::UpstreamClientError.default_status(), 400);
        assert_eq!(FailureKind::UpstreamServerError.default_status(), 400);
        assert_eq!(FailureKind::DuplicateResource.default_status(), 409);
        assert_eq!(FailureKind::BadCredentials.default_status(), 401);
    }

    #[test]
    fn only_validation_carries_fields() {
        for k in &ALL {
            assert_eq!(k.carries_field_errors(), *k == FailureKind::Validation);
        }
    }

    #[test]
    fn serde_format_matches_as_str() {
        for k in &ALL {
            let json = serde_json::to_string(k).unwrap();
            assert_eq!(json, format!("\"{}\"", k.as_str()));
        }
    }

    #[test]
    fn join_preserves_declaration_order() {
        let fields = vec![
            FieldError::new("title", "제목은 필수입니다."),
            FieldError::new("content", "내용은 필수입니다."),
        ];
        assert_eq!(
            join_field_errors(&fields),
            "title: 제목은 필수입니다.; content: 내용은 필수입니다."
        );
    }

    #[test]
    fn join_empty_is_empty() {
        assert_eq!(join_field_errors(&[]), "");
    }

    #[test]
    fn simple_failure_has_no_fields() {
        let f = ValidationFailure::simple(FailureKind::NotFound, "게시글을 찾을 수 없습니다.");
        assert!(f.fields().is_empty());
        assert_eq!(f.summary(), "게시글을 찾을 수 없습니다.");
        assert_eq!(f.kind().default_status(), 404);
    }

    #[test]
    fn field_failure_summary_is_joined_fields() {
        let f = ValidationFailure::from_fields(vec![FieldError::new("title", "제목은 필수입니다.")]);
        assert_eq!(f.kind(), FailureKind::Validation);
        assert_eq!(f.summary(), "title: 제목은 필수입니다.");
        assert_eq!(f.message(), f.summary());
    }

    #[test]
    fn display_includes_kind_and_message() {
        let f = ValidationFailure::simple(FailureKind::DuplicateResource, "dup");
        assert_eq!(f.to_string(), "duplicate_resource: dup");
    }
}
