//! Named sanitizer and validator tables
//!
//! [`Registry`] is the stock [`Resolve`] implementation: two hash maps keyed
//! by name. It is populated up front and then shared read-only by any number
//! of concurrent runs (wrap it in an `Arc` to share it across tasks).
//!
//! # Examples
//!
//! ```
//! use serde_json::Value;
//! use vigil_validator::prelude::*;
//!
//! let registry = Registry::new()
//!     .with_sanitizer("lowercase", |_: &RunContext<'_>, _: &Rule, v: &Value| {
//!         v.as_str().map_or_else(|| v.clone(), |s| Value::from(s.to_lowercase()))
//!     })
//!     .with_async_validator("available", |_: &RunContext<'_>, _: &Rule, v: Option<&Value>| {
//!         let taken = v.and_then(Value::as_str) == Some("admin");
//!         async move { AsyncVerdict::Ok(taken.then(|| Value::from("already taken"))) }
//!     });
//!
//! assert!(registry.contains(RuleKind::Sanitizer, "lowercase"));
//! assert!(registry.resolve_validator("available").unwrap().is_async());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use serde_json::Value;
use tracing::debug;

use crate::foundation::{AsyncVerdict, RegistryError, Resolve, RuleKind, Sanitizer, Validator};
use crate::run::RunContext;
use crate::schema::Rule;

/// Lookup tables for sanitizers and validators.
#[derive(Clone, Default)]
pub struct Registry {
    sanitizers: HashMap<String, Sanitizer>,
    validators: HashMap<String, Validator>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Builder-style registration (replaces existing entries)
    // ------------------------------------------------------------------------

    /// Adds a sanitizer, replacing any earlier one with the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_sanitizer<F>(mut self, name: impl Into<String>, sanitizer: F) -> Self
    where
        F: Fn(&RunContext<'_>, &Rule, &Value) -> Value + Send + Sync + 'static,
    {
        self.insert_sanitizer(name, Sanitizer::from_transform(sanitizer));
        self
    }

    /// Adds a sanitizer that may remove the field by returning `None`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_removing_sanitizer<F>(mut self, name: impl Into<String>, sanitizer: F) -> Self
    where
        F: Fn(&RunContext<'_>, &Rule, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.insert_sanitizer(name, Sanitizer::new(sanitizer));
        self
    }

    /// Adds a synchronous validator, replacing any earlier one with the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_validator<F>(mut self, name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&RunContext<'_>, &Rule, Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.insert_validator(name, Validator::sync(validator));
        self
    }

    /// Adds an asynchronous validator, replacing any earlier one with the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_async_validator<F, Fut>(mut self, name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&RunContext<'_>, &Rule, Option<&Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AsyncVerdict> + Send + 'static,
    {
        self.insert_validator(name, Validator::asynchronous(validator));
        self
    }

    // ------------------------------------------------------------------------
    // Checked registration (rejects duplicates)
    // ------------------------------------------------------------------------

    /// Registers a sanitizer.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken.
    pub fn register_sanitizer<F>(
        &mut self,
        name: impl Into<String>,
        sanitizer: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&RunContext<'_>, &Rule, &Value) -> Value + Send + Sync + 'static,
    {
        let name = self.vacant(RuleKind::Sanitizer, name.into())?;
        self.insert_sanitizer(name, Sanitizer::from_transform(sanitizer));
        Ok(())
    }

    /// Registers a synchronous validator.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken.
    pub fn register_validator<F>(
        &mut self,
        name: impl Into<String>,
        validator: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&RunContext<'_>, &Rule, Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        let name = self.vacant(RuleKind::Validator, name.into())?;
        self.insert_validator(name, Validator::sync(validator));
        Ok(())
    }

    /// Registers an asynchronous validator.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken.
    pub fn register_async_validator<F, Fut>(
        &mut self,
        name: impl Into<String>,
        validator: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&RunContext<'_>, &Rule, Option<&Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AsyncVerdict> + Send + 'static,
    {
        let name = self.vacant(RuleKind::Validator, name.into())?;
        self.insert_validator(name, Validator::asynchronous(validator));
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Raw handles
    // ------------------------------------------------------------------------

    /// Inserts a sanitizer handle, returning the one it replaced.
    ///
    /// Use this for types implementing [`Sanitize`](crate::foundation::Sanitize) directly.
    pub fn insert_sanitizer(
        &mut self,
        name: impl Into<String>,
        sanitizer: Sanitizer,
    ) -> Option<Sanitizer> {
        let name = name.into();
        debug!(sanitizer = %name, "registering sanitizer");
        self.sanitizers.insert(name, sanitizer)
    }

    /// Inserts a validator handle, returning the one it replaced.
    ///
    /// Use this for types implementing [`Validate`](crate::foundation::Validate)
    /// or [`AsyncValidate`](crate::foundation::AsyncValidate) directly.
    pub fn insert_validator(
        &mut self,
        name: impl Into<String>,
        validator: Validator,
    ) -> Option<Validator> {
        let name = name.into();
        debug!(validator = %name, is_async = validator.is_async(), "registering validator");
        self.validators.insert(name, validator)
    }

    /// Removes a sanitizer or validator.
    ///
    /// Returns true if something was removed.
    pub fn remove(&mut self, kind: RuleKind, name: &str) -> bool {
        match kind {
            RuleKind::Sanitizer => self.sanitizers.remove(name).is_some(),
            RuleKind::Validator => self.validators.remove(name).is_some(),
        }
    }

    /// Registered sanitizer names, sorted.
    pub fn sanitizer_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.sanitizers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered validator names, sorted.
    pub fn validator_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn vacant(&self, kind: RuleKind, name: String) -> Result<String, RegistryError> {
        if self.contains(kind, &name) {
            return Err(RegistryError::Duplicate { kind, name });
        }
        Ok(name)
    }
}

impl Resolve for Registry {
    fn resolve_sanitizer(&self, name: &str) -> Option<&Sanitizer> {
        self.sanitizers.get(name)
    }

    fn resolve_validator(&self, name: &str) -> Option<&Validator> {
        self.validators.get(name)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("sanitizers", &self.sanitizer_names())
            .field("validators", &self.validator_names())
            .finish()
    }
}
