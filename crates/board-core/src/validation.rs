//! # Field Validation
//!
//! [`BindingResult`] is the outcome of binding one form: an ordered list of
//! field errors, empty when the input is acceptable. Form DTOs implement
//! [`Validate`] and push errors in declaration order, so the display order
//! of a failure matches the order the checks are written in.

use serde::{Deserialize, Serialize};

use crate::failure::{FieldError, ValidationFailure};

/// Ordered field errors collected while validating one bound input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingResult {
    errors: Vec<FieldError>,
}

impl BindingResult {
    /// An empty result (no errors).
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against `field`.
    pub fn reject(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Reject `field` when `value` is empty or whitespace only.
    pub fn require_not_blank(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.reject(field, message);
        }
    }

    /// Reject `field` when `value` is longer than `max` characters.
    pub fn require_max_chars(&mut self, field: &str, value: &str, max: usize, message: &str) {
        if value.chars().count() > max {
            self.reject(field, message);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Convert into a `Validation` failure, or `None` when there are no errors.
    pub fn into_failure(self) -> Option<ValidationFailure> {
        if self.errors.is_empty() {
            None
        } else {
            Some(ValidationFailure::from_fields(self.errors))
        }
    }
}

impl From<Vec<FieldError>> for BindingResult {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

/// Implemented by form inputs that check their own field constraints.
pub trait Validate {
    /// Push every violated constraint into `result`, in declaration order.
    fn validate(&self, result: &mut BindingResult);

    /// Validate into a fresh [`BindingResult`].
    fn bind(&self) -> BindingResult {
        let mut result = BindingResult::new();
        self.validate(&mut result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Titled {
        title: String,
        content: String,
    }

    impl Validate for Titled {
        fn validate(&self, result: &mut BindingResult) {
            result.require_not_blank("title", &self.title, "제목은 필수입니다.");
            result.require_max_chars("title", &self.title, 100, "제목은 100자 이내여야 합니다.");
            result.require_not_blank("content", &self.content, "내용은 필수입니다.");
        }
    }

    #[test]
    fn valid_input_has_no_errors() {
        let r = Titled {
            title: "hello".into(),
            content: "world".into(),
        }
        .bind();
        assert!(!r.has_errors());
        assert!(r.into_failure().is_none());
    }

    #[test]
    fn blank_fields_rejected_in_declaration_order() {
        let r = Titled {
            title: "   ".into(),
            content: String::new(),
        }
        .bind();
        let fields: Vec<_> = r.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "content"]);
    }

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        let exactly = "가".repeat(100);
        let over = "가".repeat(101);
        assert!(!Titled {
            title: exactly,
            content: "c".into()
        }
        .bind()
        .has_errors());
        let r = Titled {
            title: over,
            content: "c".into(),
        }
        .bind();
        assert_eq!(r.field_errors()[0].message, "제목은 100자 이내여야 합니다.");
    }

    #[test]
    fn into_failure_message_is_joined() {
        let f = Titled {
            title: String::new(),
            content: "c".into(),
        }
        .bind()
        .into_failure()
        .unwrap();
        assert_eq!(f.message(), "title: 제목은 필수입니다.");
    }

    proptest! {
        #[test]
        fn summary_joins_every_error_in_order(
            pairs in proptest::collection::vec(("[a-z]{1,8}", "[^;]{0,16}"), 1..6)
        ) {
            let mut r = BindingResult::new();
            for (field, message) in &pairs {
                r.reject(field.clone(), message.clone());
            }
            let expected = pairs
                .iter()
                .map(|(f, m)| format!("{f}: {m}"))
                .collect::<Vec<_>>()
                .join("; ");
            let failure = r.into_failure().unwrap();
            prop_assert_eq!(failure.summary(), expected);
        }
    }
}
