//! Core error type.
//!
//! Raised by [`DispatchConfig::validate`](crate::DispatchConfig::validate);
//! `td-sim` wraps it when a world is built from a bad configuration.

use thiserror::Error;

/// Errors raised by `td-core` itself.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}
