//! Validation runs
//!
//! A [`Run`] is created for one (subject, schema, group filter) triple,
//! executed once, and consumed. Execution has two passes:
//!
//! 1. **Sanitize**: every applicable sanitizer, field by field in schema
//!    order, rewriting the subject in place.
//! 2. **Validate**: a scan in schema order that runs synchronous validators
//!    inline and queues asynchronous ones. Once the scan is done, the queued
//!    validators are started together and awaited as a batch.
//!
//! An unknown sanitizer or validator name ends the run immediately with
//! [`RunError::Unresolved`]. A hard failure from an asynchronous validator
//! ends it with [`RunError::ValidatorFailed`], which still carries the
//! sanitized subject and the errors recorded so far. The other asynchronous
//! validators are not cancelled by a hard failure; they run to completion
//! and their verdicts are discarded.
//!
//! # Examples
//!
//! ```
//! use serde_json::{json, Value};
//! use vigil_validator::prelude::*;
//!
//! let registry = Registry::new()
//!     .with_sanitizer("trim", |_: &RunContext<'_>, _: &Rule, v: &Value| {
//!         v.as_str().map_or_else(|| v.clone(), |s| Value::from(s.trim()))
//!     })
//!     .with_validator("required", |_: &RunContext<'_>, _: &Rule, v: Option<&Value>| {
//!         v.is_none().then(|| ValidationError::required().into_payload())
//!     });
//!
//! let schema = Schema::new()
//!     .field("name", [Rule::sanitizer("trim"), Rule::validator("required")])
//!     .field("email", [Rule::validator("required")]);
//!
//! let subject = json!({"name": "  Ada  "}).as_object().cloned().unwrap();
//! let report = Run::new(&registry, subject, &schema).execute_blocking().unwrap();
//!
//! assert!(!report.is_valid());
//! assert_eq!(report.field("name"), Some(&json!("Ada")));
//! assert_eq!(report.field_errors("email").map(<[_]>::len), Some(1));
//! ```

mod error;
mod sanitize;
mod status;
mod validate;

pub use error::RunError;
pub use status::Status;

use validate::{Interrupted, Stragglers};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::foundation::Resolve;
use crate::schema::{Groups, Schema};

/// The object being validated.
pub type Subject = Map<String, Value>;

// ============================================================================
// RUN CONTEXT
// ============================================================================

/// Read-only view of a run handed to every sanitizer and validator.
///
/// Sanitizers see the subject as sanitized so far. Validators see the fully
/// sanitized subject and the errors recorded before them.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    subject: &'a Subject,
    groups: &'a Groups,
    status: &'a Status,
}

impl<'a> RunContext<'a> {
    pub(crate) fn new(subject: &'a Subject, groups: &'a Groups, status: &'a Status) -> Self {
        Self {
            subject,
            groups,
            status,
        }
    }

    /// The whole subject.
    pub fn subject(&self) -> &'a Subject {
        self.subject
    }

    /// Current value of a field.
    pub fn field(&self, key: &str) -> Option<&'a Value> {
        self.subject.get(key)
    }

    /// Group filter the run was created with.
    pub fn groups(&self) -> &'a Groups {
        self.groups
    }

    /// Whether no error has been recorded yet.
    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    /// Errors recorded so far for a field.
    pub fn field_errors(&self, key: &str) -> Option<&'a [Value]> {
        self.status.field_errors(key)
    }
}

// ============================================================================
// RUN
// ============================================================================

/// A single validation run.
///
/// Borrows the registry and the schema; owns the subject and the status.
pub struct Run<'a, R: Resolve + ?Sized> {
    registry: &'a R,
    schema: &'a Schema,
    subject: Subject,
    groups: Groups,
    status: Status,
}

impl<'a, R: Resolve + ?Sized> Run<'a, R> {
    /// Creates a run with no group filter.
    pub fn new(registry: &'a R, subject: Subject, schema: &'a Schema) -> Self {
        Self {
            registry,
            schema,
            subject,
            groups: Groups::new(),
            status: Status::new(),
        }
    }

    /// Sets the group filter.
    ///
    /// Accepts a single label, a list of labels, or `None`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_groups(mut self, groups: impl Into<Groups>) -> Self {
        self.groups = groups.into();
        self
    }

    /// Group filter of this run.
    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Runs both passes to completion.
    ///
    /// On a hard failure the remaining asynchronous validators are still
    /// driven to completion before the error is returned.
    pub async fn execute(self) -> Result<Report, RunError> {
        match self.drive().await {
            Ok(report) => Ok(report),
            Err(Interrupted { error, stragglers }) => {
                stragglers.finish().await;
                Err(error)
            }
        }
    }

    /// Runs to completion and hands the outcome to `on_complete`.
    ///
    /// A hard failure is delivered as soon as it arrives. The returned future
    /// then keeps driving the remaining asynchronous validators until they
    /// finish, discarding their verdicts.
    pub async fn execute_with<F>(self, on_complete: F)
    where
        F: FnOnce(Result<Report, RunError>),
    {
        match self.drive().await {
            Ok(report) => on_complete(Ok(report)),
            Err(Interrupted { error, stragglers }) => {
                on_complete(Err(error));
                stragglers.finish().await;
            }
        }
    }

    /// Runs to completion on the current thread.
    ///
    /// Asynchronous validators are polled by a local executor, so they must
    /// not depend on a runtime context (such as tokio timers or I/O).
    pub fn execute_blocking(self) -> Result<Report, RunError> {
        futures::executor::block_on(self.execute())
    }

    async fn drive(mut self) -> Result<Report, Interrupted<'a>> {
        debug!(
            fields = self.schema.len(),
            groups = ?self.groups,
            "starting validation run"
        );

        if let Err(unknown) = self.sanitize() {
            let error = unknown.into_error(self.subject);
            warn!(%error, "validation run aborted during sanitization");
            return Err(Interrupted {
                error,
                stragglers: Stragglers::none(),
            });
        }

        let pending = match self.scan() {
            Ok(pending) => pending,
            Err(unknown) => {
                let error = unknown.into_error(self.subject);
                warn!(%error, "validation run aborted during validation");
                return Err(Interrupted {
                    error,
                    stragglers: Stragglers::none(),
                });
            }
        };

        let deferred = pending.len();
        if deferred > 0 {
            if let Err(interrupted) = self.settle(pending).await {
                warn!(
                    error = %interrupted.error,
                    still_running = interrupted.stragglers.len(),
                    "asynchronous validator failed"
                );
                return Err(interrupted);
            }
        }

        debug!(
            valid = self.status.is_valid(),
            errors = self.status.error_count(),
            deferred,
            "validation run completed"
        );

        Ok(Report {
            subject: self.subject,
            status: self.status,
        })
    }

    fn context(&self) -> RunContext<'_> {
        RunContext::new(&self.subject, &self.groups, &self.status)
    }
}

impl<R: Resolve + ?Sized> std::fmt::Debug for Run<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Run")
            .field("schema", &self.schema)
            .field("subject", &self.subject)
            .field("groups", &self.groups)
            .field("status", &self.status)
            .finish()
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// Outcome of a completed run: the sanitized subject and its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    subject: Subject,
    status: Status,
}

impl Report {
    /// Returns false if any validator recorded an error.
    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    /// All errors by field, or `None` when valid.
    pub fn errors(&self) -> Option<&IndexMap<String, Vec<Value>>> {
        self.status.errors()
    }

    /// Errors for a single field.
    pub fn field_errors(&self, key: &str) -> Option<&[Value]> {
        self.status.field_errors(key)
    }

    /// The sanitized subject.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Sanitized value of a field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.subject.get(key)
    }

    /// The run's status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Consumes the report, returning the sanitized subject.
    pub fn into_subject(self) -> Subject {
        self.subject
    }

    /// Consumes the report, returning subject and status.
    pub fn into_parts(self) -> (Subject, Status) {
        (self.subject, self.status)
    }
}
