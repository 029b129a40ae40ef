//! Core validation types and traits
//!
//! This module contains the fundamental building blocks every run is made of:
//!
//! - **Traits**: [`Sanitize`], [`Validate`], [`AsyncValidate`], [`Resolve`]
//! - **Handles**: [`Sanitizer`], [`Validator`] (tagged `Sync` / `Async`)
//! - **Errors**: [`ValidationError`], [`RegistryError`]
//!
//! # Architecture
//!
//! ## 1. Explicit execution kind
//!
//! A validator is synchronous or asynchronous because it was registered as
//! one, never because of how it happens to be called:
//!
//! ```rust,ignore
//! registry.insert_validator("required", Validator::sync(Required));
//! registry.insert_validator("unique_email", Validator::asynchronous(UniqueEmail::new(pool)));
//! ```
//!
//! ## 2. Injected lookup
//!
//! A run resolves rule names through a [`Resolve`] reference handed to it at
//! construction. There are no global tables.
//!
//! ## 3. Opaque payloads
//!
//! Validators report any [`serde_json::Value`]. [`ValidationError`] is the
//! conventional shape, convertible with [`ValidationError::into_payload`].

pub mod error;
pub mod traits;

pub use error::{BoxError, RegistryError, ValidationError};
pub use traits::{
    AsyncValidate, AsyncVerdict, Resolve, RuleKind, Sanitize, Sanitizer, Validate, Validator,
};
