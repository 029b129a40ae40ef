//! Prelude module for convenient imports.
//!
//! Provides a single `use vigil_validator::prelude::*;` import that brings
//! in the traits, handles and types needed to register functions, describe a
//! schema and execute a run.

pub use crate::foundation::{
    AsyncValidate, AsyncVerdict, BoxError, RegistryError, Resolve, RuleKind, Sanitize, Sanitizer,
    Validate, ValidationError, Validator,
};
pub use crate::registry::Registry;
pub use crate::run::{Report, Run, RunContext, RunError, Status, Subject};
pub use crate::schema::{Groups, Rule, Schema, SchemaError};
