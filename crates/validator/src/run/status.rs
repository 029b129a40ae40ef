//! Per-run error aggregation

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors collected by a run, grouped by field.
///
/// Starts valid. The first recorded error clears the flag and nothing sets it
/// again. Within a field, errors keep the order they were recorded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    errors: IndexMap<String, Vec<Value>>,
    valid: bool,
}

impl Status {
    /// Creates an empty, valid status.
    #[must_use]
    pub fn new() -> Self {
        Self {
            errors: IndexMap::new(),
            valid: true,
        }
    }

    /// Returns false once any error has been recorded.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// All errors by field, or `None` while the status is valid.
    pub fn errors(&self) -> Option<&IndexMap<String, Vec<Value>>> {
        if self.valid { None } else { Some(&self.errors) }
    }

    /// Errors recorded for a single field.
    pub fn field_errors(&self, key: &str) -> Option<&[Value]> {
        self.errors.get(key).map(Vec::as_slice)
    }

    /// Total number of recorded errors across all fields.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Consumes the status, returning the error map.
    pub fn into_errors(self) -> IndexMap<String, Vec<Value>> {
        self.errors
    }

    pub(crate) fn add_error(&mut self, key: &str, payload: Value) {
        self.errors.entry(key.to_owned()).or_default().push(payload);
        self.valid = false;
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}
