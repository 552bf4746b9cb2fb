//! # Validation Guard
//!
//! A guarded operation declares a [`GuardPolicy`]: the view to re-render
//! on failure and, for edit forms, the name of the argument holding the
//! resource id. [`run_guarded`] checks the binding result before the
//! operation body runs. With errors present it raises
//! [`AppError::Validation`] carrying a complete [`ErrorContext`] and the
//! body never executes. Without errors the body runs exactly once.

use std::future::Future;

use board_core::BindingResult;

use crate::context::ErrorContext;
use crate::error::AppError;
use crate::extractors::Bound;
use crate::forms::FormInput;
use crate::view::View;

/// Per-operation guard configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    pub target_view: View,
    pub path_identifier_field: Option<&'static str>,
}

impl GuardPolicy {
    pub const fn new(target_view: View) -> Self {
        Self {
            target_view,
            path_identifier_field: None,
        }
    }

    /// Resolve the path identifier from the operation argument named `field`.
    pub const fn with_path_identifier(self, field: &'static str) -> Self {
        Self {
            target_view: self.target_view,
            path_identifier_field: Some(field),
        }
    }
}

/// The named scalar arguments of one operation invocation.
#[derive(Debug, Clone, Default)]
pub struct OperationArgs {
    values: Vec<(&'static str, Option<String>)>,
}

impl OperationArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: Option<impl ToString>) -> Self {
        self.values.push((name, value.map(|v| v.to_string())));
        self
    }

    /// The value bound to `name`, if that argument exists and is present.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.as_deref())
    }
}

/// Check `binding` under `policy`. Returns `Ok(())` when there are no errors.
pub fn guard<T>(
    policy: &GuardPolicy,
    input: &T,
    binding: &BindingResult,
    args: &OperationArgs,
) -> Result<(), AppError>
where
    T: Clone + Into<FormInput>,
{
    let Some(failure) = binding.clone().into_failure() else {
        return Ok(());
    };

    let path_identifier = policy
        .path_identifier_field
        .and_then(|field| args.resolve(field))
        .map(str::to_string);

    tracing::debug!(
        view = %policy.target_view,
        errors = failure.fields().len(),
        path_identifier = ?path_identifier,
        "guard rejected input"
    );

    let context = ErrorContext::builder(failure, policy.target_view)
        .submitted_input(input.clone())
        .path_identifier(path_identifier)
        .build();
    Err(AppError::Validation(Box::new(context)))
}

/// Run `op` on the bound input only if the guard passes.
pub async fn run_guarded<T, F, Fut, R>(
    policy: &GuardPolicy,
    bound: Bound<T>,
    args: &OperationArgs,
    op: F,
) -> Result<R, AppError>
where
    T: Clone + Into<FormInput>,
    F: FnOnce(T) -> Fut,
    Fut: Future<Output = Result<R, AppError>>,
{
    guard(policy, &bound.input, &bound.binding, args)?;
    op(bound.input).await
}
