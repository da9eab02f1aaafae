//! Read-side type coercion for store values.
//!
//! Responsibilities:
//! - Define the coercion kinds a caller can request from [`crate::Store::get_as`].
//! - Convert a resolved raw value (environment text, store text, or a
//!   caller-supplied default) into the requested representation.
//! - Stringify dynamic values for storage (shared with `set`).
//!
//! Does NOT handle:
//! - Key resolution or precedence (see store.rs).
//! - Persistence (see store.rs).
//!
//! Invariants:
//! - A null raw value coerces to the kind's empty sentinel: NaN for
//!   `Number`, `false` for `Boolean`, null otherwise.
//! - Boolean coercion of text tries a numeric reading first; only
//!   non-numeric text is matched against the `true`/`yes`/`on` tokens.
//! - Composite values (objects, arrays) are never numbers: they coerce to
//!   NaN under `Number` and to their JSON text under `Text`.

use std::fmt;

use serde_json::Value;

use crate::error::{Result, StoreError};

/// Truth tokens recognized by the boolean coercion, matched
/// case-insensitively against non-numeric text.
const TRUE_TOKENS: [&str; 3] = ["true", "yes", "on"];

/// A coercion to apply to the raw value resolved by [`crate::Store::get_as`].
pub enum Coerce {
    /// Textual form: composites serialize to compact JSON text, scalars to
    /// their usual rendering.
    Text,
    /// Numeric form: text via standard parsing (unparseable text is NaN),
    /// booleans as 0/1, composites always NaN.
    Number,
    /// Boolean form: see the invariants above for the text rules;
    /// non-textual values use standard truthiness.
    Boolean,
    /// Parse textual values as JSON; non-textual values pass through
    /// unchanged. A malformed document is a [`StoreError::Parse`].
    Json,
    /// Compile textual values into invocable code.
    ///
    /// # Danger
    ///
    /// This coercion evaluates arbitrary configuration text as code and is
    /// part of the store's contract as a deliberate, dangerous capability.
    /// This build carries no sandboxed expression evaluator, so requesting
    /// it for a textual value fails with [`StoreError::CodeUnsupported`]
    /// (and yields null for non-textual values, which were never
    /// compilable). Callers who bring their own evaluator should wire it
    /// through [`Coerce::Custom`] instead.
    Code,
    /// A caller-supplied conversion, invoked with the raw value.
    Custom(Box<dyn Fn(Value) -> Value + Send + Sync>),
}

impl fmt::Debug for Coerce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Coerce::Text => "Text",
            Coerce::Number => "Number",
            Coerce::Boolean => "Boolean",
            Coerce::Json => "Json",
            Coerce::Code => "Code",
            Coerce::Custom(_) => "Custom(..)",
        };
        f.write_str(name)
    }
}

/// The result of a coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// No value: the raw value was null and the kind has no other sentinel.
    Null,
    /// Result of a [`Coerce::Text`] request.
    Text(String),
    /// Result of a [`Coerce::Number`] request. May be NaN.
    Number(f64),
    /// Result of a [`Coerce::Boolean`] request.
    Bool(bool),
    /// Result of a [`Coerce::Json`] or [`Coerce::Custom`] request.
    Value(Value),
}

impl Coerced {
    /// The contained number, if this is a `Number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Coerced::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The contained boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Coerced::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Apply `kind` to a resolved raw value.
pub(crate) fn apply(kind: &Coerce, raw: Value) -> Result<Coerced> {
    if raw.is_null() {
        // Empty sentinel per kind.
        return Ok(match kind {
            Coerce::Number => Coerced::Number(f64::NAN),
            Coerce::Boolean => Coerced::Bool(false),
            _ => Coerced::Null,
        });
    }

    Ok(match kind {
        Coerce::Text => Coerced::Text(stringify(&raw)),
        Coerce::Number => Coerced::Number(to_number(&raw)),
        Coerce::Boolean => Coerced::Bool(to_bool(&raw)),
        Coerce::Json => match raw {
            Value::String(text) => Coerced::Value(serde_json::from_str(&text)?),
            other => Coerced::Value(other),
        },
        Coerce::Code => match raw {
            Value::String(_) => return Err(StoreError::CodeUnsupported),
            _ => Coerced::Null,
        },
        Coerce::Custom(f) => Coerced::Value(f(raw)),
    })
}

/// Textual form of a dynamic value: scalars render directly, composites as
/// compact JSON text, null as the empty string. Shared by `set` (value and
/// key stringification) and the `Text` coercion.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        composite => composite.to_string(),
    }
}

fn to_number(value: &Value) -> f64 {
    match value {
        Value::Object(_) | Value::Array(_) => f64::NAN,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::Null => f64::NAN,
    }
}

fn to_bool(value: &Value) -> bool {
    match value {
        Value::String(s) => {
            // Numeric reading first: any non-zero number is true. The token
            // match applies only to text with no numeric reading, and does
            // not trim.
            match s.trim().parse::<f64>() {
                Ok(n) if !n.is_nan() => n != 0.0,
                _ => TRUE_TOKENS.iter().any(|t| s.eq_ignore_ascii_case(t)),
            }
        }
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0 && !n.is_nan()).unwrap_or(false),
        Value::Object(_) | Value::Array(_) => true,
        Value::Null => false,
    }
}
