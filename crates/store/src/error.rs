//! Error types for store operations.
//!
//! Responsibilities:
//! - Define error variants for all store failures (key validation, value
//!   validation, JSON parsing, file I/O).
//! - Provide conversions from lower-level errors (`serde_json::Error`,
//!   `std::io::Error`).
//!
//! Does NOT handle:
//! - Recovery or fallback behavior (callers decide).
//!
//! Invariants:
//! - `InvalidValue` always names the offending key.
//! - Synchronous and asynchronous entry points share these variants; the
//!   async forms deliver them through the returned future, never by panic.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A key argument was null where a usable key is required.
    #[error("key cannot be null")]
    InvalidKey,

    /// A merged or loaded mapping contained a non-string value.
    #[error("value for key \"{key}\" must be a string")]
    InvalidValue {
        /// The key whose value failed validation.
        key: String,
    },

    /// Malformed JSON encountered during load, merge, or coercion.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The code coercion was requested but no expression evaluator is
    /// available in this build. See [`crate::Coerce::Code`].
    #[error("code coercion requires an expression evaluator, which this build does not provide")]
    CodeUnsupported,
}

pub type Result<T> = std::result::Result<T, StoreError>;
