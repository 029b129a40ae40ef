//! Run error types.

use crate::foundation::{BoxError, RuleKind};
use crate::run::{Report, Status, Subject};

/// Errors that end a run early.
///
/// Validation errors are not here: they are recorded in the [`Status`] and
/// never abort anything. Both variants hand the subject back, including any
/// sanitization already applied.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A rule names a sanitizer or validator the registry does not know.
    ///
    /// Detected during the sanitizer pass or the validator scan. Nothing after
    /// the offending rule is evaluated and no asynchronous validator is started.
    #[error("invalid {kind} {name}")]
    Unresolved {
        /// Which kind of function was looked up.
        kind: RuleKind,
        /// Field whose rule list holds the offending rule.
        field: String,
        /// The unknown name.
        name: String,
        /// The subject as it stood when the run stopped.
        subject: Subject,
    },

    /// An asynchronous validator reported a hard failure.
    #[error("validator {name} failed on field {field}: {source}")]
    ValidatorFailed {
        /// Field being validated.
        field: String,
        /// Validator name.
        name: String,
        /// The failure reported by the validator.
        #[source]
        source: BoxError,
        /// The sanitized subject and the errors recorded up to the failure.
        report: Report,
    },
}

impl RunError {
    /// Returns true for unknown-name errors.
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Unresolved { .. })
    }

    /// Field the error was raised for.
    pub fn field(&self) -> &str {
        match self {
            Self::Unresolved { field, .. } | Self::ValidatorFailed { field, .. } => field,
        }
    }

    /// Status accumulated before a hard validator failure.
    ///
    /// Resolution errors carry no status.
    pub fn status(&self) -> Option<&Status> {
        self.report().map(Report::status)
    }

    /// Partial report of a hard validator failure.
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Unresolved { .. } => None,
            Self::ValidatorFailed { report, .. } => Some(report),
        }
    }

    /// The subject as it stood when the run stopped.
    pub fn subject(&self) -> &Subject {
        match self {
            Self::Unresolved { subject, .. } => subject,
            Self::ValidatorFailed { report, .. } => report.subject(),
        }
    }

    /// Consumes the error, returning the subject.
    pub fn into_subject(self) -> Subject {
        match self {
            Self::Unresolved { subject, .. } => subject,
            Self::ValidatorFailed { report, .. } => report.into_subject(),
        }
    }
}

/// An unknown rule name met during a pass.
///
/// Becomes [`RunError::Unresolved`] once the run gives the subject back.
#[derive(Debug)]
pub(crate) struct UnknownRule {
    kind: RuleKind,
    field: String,
    name: String,
}

impl UnknownRule {
    pub(crate) fn new(kind: RuleKind, field: &str, name: &str) -> Self {
        Self {
            kind,
            field: field.to_owned(),
            name: name.to_owned(),
        }
    }

    pub(crate) fn into_error(self, subject: Subject) -> RunError {
        RunError::Unresolved {
            kind: self.kind,
            field: self.field,
            name: self.name,
            subject,
        }
    }
}
