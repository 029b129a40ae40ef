//! Validator pass: synchronous scan, then the asynchronous barrier

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use tracing::trace;

use crate::foundation::{AsyncValidate, AsyncVerdict, Resolve, RuleKind, Validator};
use crate::run::error::UnknownRule;
use crate::run::{Report, Run, RunError};
use crate::schema::Rule;

/// An asynchronous validator queued during the scan.
pub(super) struct PendingCheck<'s> {
    field: &'s str,
    name: &'s str,
    rule: &'s Rule,
    value: Option<Value>,
    validator: Arc<dyn AsyncValidate>,
}

type Settled<'s> = (&'s str, &'s str, AsyncVerdict);

/// Asynchronous checks still running when a hard failure arrived.
pub(super) struct Stragglers<'s>(FuturesUnordered<BoxFuture<'s, Settled<'s>>>);

impl Stragglers<'_> {
    pub(super) fn none() -> Self {
        Self(FuturesUnordered::new())
    }

    pub(super) fn len(&self) -> usize {
        self.0.len()
    }

    /// Drives the remaining checks to completion, discarding their verdicts.
    pub(super) async fn finish(mut self) {
        while let Some((field, name, verdict)) = self.0.next().await {
            trace!(
                field,
                validator = name,
                hard_failure = verdict.is_err(),
                "discarded verdict after hard failure"
            );
        }
    }
}

/// A run that stopped early, plus whatever is still in flight.
pub(super) struct Interrupted<'s> {
    pub(super) error: RunError,
    pub(super) stragglers: Stragglers<'s>,
}

impl<'a, R: Resolve + ?Sized> Run<'a, R> {
    /// Walks the schema once, running synchronous validators inline.
    ///
    /// Asynchronous validators are not invoked here; they are returned in
    /// scan order for [`settle`](Self::settle).
    pub(super) fn scan(&mut self) -> Result<Vec<PendingCheck<'a>>, UnknownRule> {
        let schema = self.schema;
        let registry = self.registry;
        let mut pending = Vec::new();

        for (key, rules) in schema.iter() {
            for rule in rules {
                let Some(name) = rule.validator_name() else {
                    continue;
                };
                if !self.groups.admits(rule.groups()) {
                    continue;
                }

                let validator = registry
                    .resolve_validator(name)
                    .ok_or_else(|| UnknownRule::new(RuleKind::Validator, key, name))?;

                match validator {
                    Validator::Sync(check) => {
                        let verdict =
                            check.validate(&self.context(), rule, self.subject.get(key));
                        trace!(
                            field = key,
                            validator = name,
                            passed = verdict.is_none(),
                            "ran validator"
                        );
                        if let Some(payload) = verdict {
                            self.status.add_error(key, payload);
                        }
                    }
                    Validator::Async(check) => {
                        trace!(field = key, validator = name, "deferred validator");
                        pending.push(PendingCheck {
                            field: key,
                            name,
                            rule,
                            value: self.subject.get(key).cloned(),
                            validator: Arc::clone(check),
                        });
                    }
                }
            }
        }

        Ok(pending)
    }

    /// Starts every queued validator and waits for all of them.
    ///
    /// Completion order is whatever the futures produce; each verdict is
    /// recorded as it arrives. The first hard failure stops the wait and moves
    /// the subject and status into the error. The checks still running are
    /// handed back so the caller can drive them to completion.
    pub(super) async fn settle(
        &mut self,
        pending: Vec<PendingCheck<'a>>,
    ) -> Result<(), Interrupted<'a>> {
        let mut in_flight: FuturesUnordered<BoxFuture<'a, Settled<'a>>> = {
            let ctx = self.context();
            pending
                .into_iter()
                .map(|check| {
                    let verdict = check
                        .validator
                        .validate_async(&ctx, check.rule, check.value.as_ref());
                    let (field, name) = (check.field, check.name);
                    async move { (field, name, verdict.await) }.boxed()
                })
                .collect()
        };

        while let Some((field, name, verdict)) = in_flight.next().await {
            match verdict {
                Ok(None) => trace!(field, validator = name, "async validator passed"),
                Ok(Some(payload)) => {
                    trace!(field, validator = name, "async validator failed");
                    self.status.add_error(field, payload);
                }
                Err(source) => {
                    let report = Report {
                        subject: std::mem::take(&mut self.subject),
                        status: std::mem::take(&mut self.status),
                    };
                    return Err(Interrupted {
                        error: RunError::ValidatorFailed {
                            field: field.to_owned(),
                            name: name.to_owned(),
                            source,
                            report,
                        },
                        stragglers: Stragglers(in_flight),
                    });
                }
            }
        }

        Ok(())
    }
}
