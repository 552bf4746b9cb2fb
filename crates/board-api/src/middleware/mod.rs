//! # Middleware
//!
//! - [`boundary`]: session resolution and failure-to-response synthesis.
//! - [`login_gate`]: rejects anonymous callers outside the public paths.
//! - [`tracing_layer`]: per-request tracing spans.

pub mod boundary;
pub mod login_gate;
pub mod tracing_layer;
