//! # board-core — Foundational Types for the Board Application
//!
//! Defines the failure vocabulary shared by every other crate in the
//! workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Single `FailureKind` enum.** One definition, eight variants,
//!    exhaustive `match` everywhere. Each kind owns its default status.
//!
//! 2. **Field errors keep declaration order.** `BindingResult` is an ordered
//!    list, never a map, so summaries read in the order checks are declared.
//!
//! 3. **Kind-specific payloads.** `ValidationFailure` only carries field
//!    errors for the `Validation` kind; every other kind carries a message.
//!
//! ## Crate Policy
//!
//! - No HTTP, async, or I/O dependencies.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod failure;
pub mod validation;

pub use failure::{join_field_errors, FailureKind, FieldError, ValidationFailure};
pub use validation::{BindingResult, Validate};
