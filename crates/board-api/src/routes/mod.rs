//! # Route Modules
//!
//! - `boards`: board listing, detail, and the guarded create/update forms.
//! - `users`: join, login, logout, and the `/api/user/info` lookup used to
//!   resolve writer names.
//! - `replies`: reply save/delete. These never raise classified failures
//!   for bad input; they redirect instead.

pub mod boards;
pub mod replies;
pub mod users;
