//! # Error Context
//!
//! The immutable record a guard attaches to a validation failure: the
//! failure itself, the input to echo back, the view to re-render, and the
//! resolved path identifier when the form edits an existing resource.
//!
//! Built once through [`ErrorContextBuilder`]; there are no setters.

use board_core::ValidationFailure;

use crate::forms::FormInput;
use crate::view::View;

#[derive(Debug, Clone)]
pub struct ErrorContext {
    failure: ValidationFailure,
    submitted_input: Option<FormInput>,
    target_view: View,
    path_identifier: Option<String>,
}

impl ErrorContext {
    pub fn builder(failure: ValidationFailure, target_view: View) -> ErrorContextBuilder {
        ErrorContextBuilder {
            failure,
            target_view,
            submitted_input: None,
            path_identifier: None,
        }
    }

    pub fn failure(&self) -> &ValidationFailure {
        &self.failure
    }

    pub fn submitted_input(&self) -> Option<&FormInput> {
        self.submitted_input.as_ref()
    }

    pub fn target_view(&self) -> View {
        self.target_view
    }

    pub fn path_identifier(&self) -> Option<&str> {
        self.path_identifier.as_deref()
    }
}

#[derive(Debug)]
pub struct ErrorContextBuilder {
    failure: ValidationFailure,
    target_view: View,
    submitted_input: Option<FormInput>,
    path_identifier: Option<String>,
}

impl ErrorContextBuilder {
    pub fn submitted_input(mut self, input: impl Into<FormInput>) -> Self {
        self.submitted_input = Some(input.into());
        self
    }

    /// Blank identifiers are treated as absent.
    pub fn path_identifier(mut self, identifier: Option<String>) -> Self {
        self.path_identifier = identifier.filter(|id| !id.trim().is_empty());
        self
    }

    pub fn build(self) -> ErrorContext {
        ErrorContext {
            failure: self.failure,
            submitted_input: self.submitted_input,
            target_view: self.target_view,
            path_identifier: self.path_identifier,
        }
    }
}
