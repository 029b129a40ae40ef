//! # vigil-validator
//!
//! A schema-driven sanitization and validation engine.
//!
//! A [`Schema`](schema::Schema) maps field keys to ordered [`Rule`](schema::Rule)s.
//! A [`Run`](run::Run) applies every applicable sanitizer first, then every
//! applicable validator, and reports per-field errors plus an overall
//! validity flag.
//!
//! ## Quick Start
//!
//! ```
//! use serde_json::{json, Value};
//! use vigil_validator::prelude::*;
//!
//! let registry = Registry::new()
//!     .with_sanitizer("to_int", |_: &RunContext<'_>, _: &Rule, v: &Value| {
//!         v.as_str()
//!             .and_then(|s| s.parse::<i64>().ok())
//!             .map_or_else(|| v.clone(), Value::from)
//!     })
//!     .with_validator("min", |_: &RunContext<'_>, rule: &Rule, v: Option<&Value>| {
//!         let min = rule.option_as::<i64>("min")?;
//!         match v.and_then(Value::as_i64) {
//!             Some(n) if n >= min => None,
//!             _ => Some(ValidationError::new("min", "Value is too small").into_payload()),
//!         }
//!     });
//!
//! let schema = Schema::new().field(
//!     "age",
//!     [Rule::sanitizer("to_int"), Rule::validator("min").with_option("min", 18)],
//! );
//!
//! let subject = json!({"age": "20"}).as_object().cloned().unwrap();
//! let report = Run::new(&registry, subject, &schema).execute_blocking().unwrap();
//!
//! assert!(report.is_valid());
//! assert_eq!(report.field("age"), Some(&json!(20)));
//! ```
//!
//! ## Synchronous and asynchronous validators
//!
//! Validators are registered as one or the other
//! ([`Validator::Sync`](foundation::Validator::Sync) /
//! [`Validator::Async`](foundation::Validator::Async)). Synchronous validators
//! run inline while the schema is scanned. Asynchronous ones are started only
//! after the scan and are awaited together; the run completes once all of them
//! have, or as soon as one fails hard.
//!
//! ## Groups
//!
//! Rules may be tagged with groups. See [`Groups::admits`](schema::Groups::admits)
//! for the selection rules.

// RunError::ValidatorFailed carries the partial Status by value.
#![allow(clippy::result_large_err)]

pub mod foundation;
pub mod prelude;
pub mod registry;
pub mod run;
pub mod schema;
