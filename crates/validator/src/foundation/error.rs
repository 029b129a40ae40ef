//! Error types shared across the crate
//!
//! Two families live here:
//!
//! - [`ValidationError`]: a structured, conventional shape for the opaque
//!   payloads validators attach to fields. Validators are free to report any
//!   [`serde_json::Value`]; this type is simply the shape the built-in helpers
//!   and most callers agree on.
//! - [`RegistryError`]: failures while populating a [`Registry`](crate::registry::Registry).
//!
//! Run-level failures live in [`crate::run::RunError`].

use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value};

use crate::foundation::RuleKind;

/// Boxed error used for hard failures reported by asynchronous validators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A structured validation error payload.
///
/// Uses `Cow<'static, str>` for zero-allocation when error codes and messages
/// are known at compile time (the common case).
///
/// # Examples
///
/// ```
/// use vigil_validator::foundation::ValidationError;
///
/// let error = ValidationError::new("min", "Value is too small")
///     .with_param("min", "18")
///     .with_param("actual", "12");
///
/// let payload = error.into_payload();
/// assert_eq!(payload["code"], "min");
/// assert_eq!(payload["params"]["min"], "18");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error code for programmatic handling.
    ///
    /// Examples: "required", "min", "not_unique"
    pub code: Cow<'static, str>,

    /// Human-readable error message.
    pub message: Cow<'static, str>,

    /// Parameters describing the failure, in insertion order.
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl ValidationError {
    /// Creates a new validation error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter to the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Creates a "required" error.
    pub fn required() -> Self {
        Self::new("required", "Value is required")
    }

    /// Creates a "type_mismatch" error.
    pub fn type_mismatch(
        expected: impl Into<Cow<'static, str>>,
        actual: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new("type_mismatch", "Type mismatch")
            .with_param("expected", expected)
            .with_param("actual", actual)
    }

    /// Converts the error into an opaque payload suitable for a field's error list.
    ///
    /// The payload is an object with `code`, `message` and, when present,
    /// a `params` object.
    #[must_use]
    pub fn into_payload(self) -> Value {
        let mut payload = Map::new();
        payload.insert("code".into(), Value::String(self.code.into_owned()));
        payload.insert("message".into(), Value::String(self.message.into_owned()));
        if !self.params.is_empty() {
            let params = self
                .params
                .into_iter()
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect();
            payload.insert("params".into(), Value::Object(params));
        }
        Value::Object(payload)
    }

    /// Reads a payload produced by [`into_payload`](Self::into_payload) back.
    ///
    /// Returns `None` when the payload does not carry a string `code` and `message`.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let code = payload.get("code")?.as_str()?;
        let message = payload.get("message")?.as_str()?;
        let params = payload
            .get("params")
            .and_then(Value::as_object)
            .map(|params| {
                params
                    .iter()
                    .filter_map(|(k, v)| {
                        v.as_str()
                            .map(|v| (Cow::Owned(k.clone()), Cow::Owned(v.to_owned())))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            code: Cow::Owned(code.to_owned()),
            message: Cow::Owned(message.to_owned()),
            params,
        })
    }
}

impl From<ValidationError> for Value {
    fn from(error: ValidationError) -> Self {
        error.into_payload()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;

        if !self.params.is_empty() {
            write!(f, " (params: [")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, "])")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// REGISTRY ERROR
// ============================================================================

/// Errors raised while populating a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A function with the same kind and name is already registered.
    #[error("{kind} `{name}` is already registered")]
    Duplicate {
        /// Kind of the conflicting registration.
        kind: RuleKind,
        /// The conflicting name.
        name: String,
    },
}

// ============================================================================
// TESTS
// ============================================================================
