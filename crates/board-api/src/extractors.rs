//! # Custom Extractors & Binding
//!
//! Form bodies are bound in two flavours:
//!
//! - [`Bound<T>`] deserializes and validates but never rejects on field
//!   errors. The handler receives the [`BindingResult`] and hands it to a
//!   guard (see [`crate::guard`]).
//! - [`Valid<T>`] rejects on field errors with [`AppError::Binding`]. That
//!   failure carries no view; the synthesizer infers one from the path.
//!
//! Both accept `application/json` or urlencoded form bodies. A body that
//! does not deserialize at all is a binding failure on the `body` field.

use axum::extract::rejection::FormRejection;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::{Form, Json};
use board_core::{BindingResult, Validate};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::forms::FormInput;

/// A deserialized input together with its validation result.
#[derive(Debug, Clone)]
pub struct Bound<T> {
    pub input: T,
    pub binding: BindingResult,
}

/// A deserialized input that passed validation.
#[derive(Debug, Clone)]
pub struct Valid<T>(pub T);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

async fn deserialize_body<T, S>(req: Request, state: &S) -> Result<T, AppError>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    if is_json(&req) {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(v)| v)
            .map_err(|e| AppError::unreadable_body(e.body_text()))
    } else {
        extract_form(Form::<T>::from_request(req, state).await)
    }
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Bound<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let input: T = deserialize_body(req, state).await?;
        let binding = input.bind();
        Ok(Self { input, binding })
    }
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate + Clone + Into<FormInput> + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let input: T = deserialize_body(req, state).await?;
        let binding = input.bind();
        if binding.has_errors() {
            return Err(AppError::Binding {
                fields: binding.field_errors().to_vec(),
                input: Some(input.into()),
            });
        }
        Ok(Self(input))
    }
}

/// Extract a form body, mapping deserialization errors to a binding failure.
///
/// For handlers that take `Result<Form<T>, FormRejection>` directly.
pub fn extract_form<T>(result: Result<Form<T>, FormRejection>) -> Result<T, AppError> {
    result
        .map(|Form(v)| v)
        .map_err(|err| AppError::unreadable_body(err.body_text()))
}
