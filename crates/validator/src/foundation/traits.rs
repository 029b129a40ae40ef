//! Traits at the extension seams of a validation run
//!
//! A run never calls user code directly; it goes through one of three traits:
//!
//! - [`Sanitize`]: synchronous value transform, applied before validation
//! - [`Validate`]: synchronous check returning an optional error payload
//! - [`AsyncValidate`]: check that completes later, or fails hard
//!
//! Whether a validator is synchronous or asynchronous is fixed when it is
//! registered, by wrapping it in the matching [`Validator`] variant.
//!
//! Named lookup goes through [`Resolve`], which the run receives by reference.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::foundation::BoxError;
use crate::run::RunContext;
use crate::schema::Rule;

/// Result of an asynchronous validator.
///
/// * `Ok(None)`: the value passed
/// * `Ok(Some(payload))`: the value failed; `payload` is appended to the field's errors
/// * `Err(_)`: hard failure; the whole run completes with this error
pub type AsyncVerdict = Result<Option<Value>, BoxError>;

// ============================================================================
// SANITIZE
// ============================================================================

/// A synchronous transform applied to a present field value.
///
/// Returning `None` removes the field: later sanitizers skip it and
/// validators see it as absent.
///
/// Implemented for every `Fn(&RunContext, &Rule, &Value) -> Option<Value>`.
/// Plain `-> Value` transforms go through [`Sanitizer::from_transform`].
pub trait Sanitize: Send + Sync {
    /// Returns the new value for the field, or `None` to remove it.
    fn sanitize(&self, ctx: &RunContext<'_>, rule: &Rule, value: &Value) -> Option<Value>;
}

impl<F> Sanitize for F
where
    F: Fn(&RunContext<'_>, &Rule, &Value) -> Option<Value> + Send + Sync,
{
    fn sanitize(&self, ctx: &RunContext<'_>, rule: &Rule, value: &Value) -> Option<Value> {
        self(ctx, rule, value)
    }
}

// ============================================================================
// VALIDATE
// ============================================================================

/// A synchronous constraint check.
///
/// `value` is `None` when the field is absent from the subject.
/// Returning `Some(payload)` records an error; any payload counts, `null` included.
///
/// # Examples
///
/// ```
/// use serde_json::Value;
/// use vigil_validator::prelude::*;
///
/// struct Required;
///
/// impl Validate for Required {
///     fn validate(&self, _ctx: &RunContext<'_>, _rule: &Rule, value: Option<&Value>) -> Option<Value> {
///         value.is_none().then(|| ValidationError::required().into_payload())
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.insert_validator("required", Validator::sync(Required));
/// assert!(registry.contains(RuleKind::Validator, "required"));
/// ```
pub trait Validate: Send + Sync {
    /// Checks the value, returning an error payload on failure.
    fn validate(&self, ctx: &RunContext<'_>, rule: &Rule, value: Option<&Value>) -> Option<Value>;
}

impl<F> Validate for F
where
    F: Fn(&RunContext<'_>, &Rule, Option<&Value>) -> Option<Value> + Send + Sync,
{
    fn validate(&self, ctx: &RunContext<'_>, rule: &Rule, value: Option<&Value>) -> Option<Value> {
        self(ctx, rule, value)
    }
}

// ============================================================================
// ASYNC VALIDATE
// ============================================================================

/// An asynchronous constraint check.
///
/// The returned future must own everything it needs: clone the value (and
/// anything read from the context) before the `async move` block.
///
/// Implemented for every `Fn(&RunContext, &Rule, Option<&Value>) -> impl Future<Output = AsyncVerdict>`
/// whose future is `Send + 'static`.
pub trait AsyncValidate: Send + Sync {
    /// Starts the check.
    fn validate_async(
        &self,
        ctx: &RunContext<'_>,
        rule: &Rule,
        value: Option<&Value>,
    ) -> BoxFuture<'static, AsyncVerdict>;
}

impl<F, Fut> AsyncValidate for F
where
    F: Fn(&RunContext<'_>, &Rule, Option<&Value>) -> Fut + Send + Sync,
    Fut: Future<Output = AsyncVerdict> + Send + 'static,
{
    fn validate_async(
        &self,
        ctx: &RunContext<'_>,
        rule: &Rule,
        value: Option<&Value>,
    ) -> BoxFuture<'static, AsyncVerdict> {
        Box::pin(self(ctx, rule, value))
    }
}

// ============================================================================
// REGISTERED HANDLES
// ============================================================================

/// A registered sanitizer.
#[derive(Clone)]
pub struct Sanitizer(Arc<dyn Sanitize>);

impl Sanitizer {
    /// Wraps a sanitizer implementation.
    pub fn new(sanitizer: impl Sanitize + 'static) -> Self {
        Self(Arc::new(sanitizer))
    }

    /// Wraps a transform that always keeps the field.
    pub fn from_transform<F>(transform: F) -> Self
    where
        F: Fn(&RunContext<'_>, &Rule, &Value) -> Value + Send + Sync + 'static,
    {
        Self::new(move |ctx: &RunContext<'_>, rule: &Rule, value: &Value| {
            Some(transform(ctx, rule, value))
        })
    }

    /// Applies the sanitizer to a present value; `None` means remove the field.
    pub fn apply(&self, ctx: &RunContext<'_>, rule: &Rule, value: &Value) -> Option<Value> {
        self.0.sanitize(ctx, rule, value)
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sanitizer(<function>)")
    }
}

/// A registered validator, tagged with its execution kind.
#[derive(Clone)]
pub enum Validator {
    /// Runs inline during the scan.
    Sync(Arc<dyn Validate>),
    /// Deferred until the scan finishes, then awaited with the others.
    Async(Arc<dyn AsyncValidate>),
}

impl Validator {
    /// Wraps a synchronous validator implementation.
    pub fn sync(validator: impl Validate + 'static) -> Self {
        Self::Sync(Arc::new(validator))
    }

    /// Wraps an asynchronous validator implementation.
    pub fn asynchronous(validator: impl AsyncValidate + 'static) -> Self {
        Self::Async(Arc::new(validator))
    }

    /// Returns true for the deferred variant.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Validator::Sync(<function>)"),
            Self::Async(_) => f.write_str("Validator::Async(<function>)"),
        }
    }
}

// ============================================================================
// RESOLVE
// ============================================================================

/// The two kinds of named rule functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Value transform.
    Sanitizer,
    /// Constraint check.
    Validator,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sanitizer => f.write_str("sanitizer"),
            Self::Validator => f.write_str("validator"),
        }
    }
}

/// Lookup-by-name capability a run is constructed with.
///
/// The run only reads through this trait; it never registers anything.
pub trait Resolve: Send + Sync {
    /// Resolves a sanitizer by name.
    fn resolve_sanitizer(&self, name: &str) -> Option<&Sanitizer>;

    /// Resolves a validator by name.
    fn resolve_validator(&self, name: &str) -> Option<&Validator>;

    /// Returns true if a function of `kind` is registered under `name`.
    fn contains(&self, kind: RuleKind, name: &str) -> bool {
        match kind {
            RuleKind::Sanitizer => self.resolve_sanitizer(name).is_some(),
            RuleKind::Validator => self.resolve_validator(name).is_some(),
        }
    }
}

impl<R: Resolve + ?Sized> Resolve for &R {
    fn resolve_sanitizer(&self, name: &str) -> Option<&Sanitizer> {
        (**self).resolve_sanitizer(name)
    }

    fn resolve_validator(&self, name: &str) -> Option<&Validator> {
        (**self).resolve_validator(name)
    }
}

impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve_sanitizer(&self, name: &str) -> Option<&Sanitizer> {
        (**self).resolve_sanitizer(name)
    }

    fn resolve_validator(&self, name: &str) -> Option<&Validator> {
        (**self).resolve_validator(name)
    }
}
