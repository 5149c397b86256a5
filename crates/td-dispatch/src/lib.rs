//! `td-dispatch` — passenger requests and taxi selection.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`request`]  | `Request`: one open request and its candidates              |
//! | [`registry`] | `RequestRegistry`, `select`, `Registration`, `Resolution`   |
//! | [`error`]    | `DispatchError`, `DispatchResult<T>`                        |
//!
//! Registration pays a taxi the pickup credit immediately, whether or not it
//! is finally selected.  Selection happens once, when the request's window
//! closes.

pub mod error;
pub mod registry;
pub mod request;

#[cfg(test)]
mod tests;

pub use error::{DispatchError, DispatchResult};
pub use registry::{Registration, RequestRegistry, Resolution, select};
pub use request::Request;
