//! Sanitizer pass

use tracing::trace;

use crate::foundation::{Resolve, RuleKind};
use crate::run::error::UnknownRule;
use crate::run::{Run, RunContext};

impl<R: Resolve + ?Sized> Run<'_, R> {
    /// Applies every applicable sanitizer in schema order.
    ///
    /// A sanitizer only runs on a field that is present, and its result is
    /// written back before the next rule is looked at. A sanitizer that
    /// returns `None` removes the field, so the field's later sanitizers
    /// are skipped.
    pub(super) fn sanitize(&mut self) -> Result<(), UnknownRule> {
        let schema = self.schema;
        let registry = self.registry;

        for (key, rules) in schema.iter() {
            for rule in rules {
                let Some(name) = rule.sanitizer_name() else {
                    continue;
                };
                let Some(current) = self.subject.get(key) else {
                    continue;
                };
                if !self.groups.admits(rule.groups()) {
                    continue;
                }

                let sanitizer = registry
                    .resolve_sanitizer(name)
                    .ok_or_else(|| UnknownRule::new(RuleKind::Sanitizer, key, name))?;

                let ctx = RunContext::new(&self.subject, &self.groups, &self.status);
                match sanitizer.apply(&ctx, rule, current) {
                    Some(sanitized) => {
                        trace!(field = key, sanitizer = name, "applied sanitizer");
                        self.subject.insert(key.to_owned(), sanitized);
                    }
                    None => {
                        trace!(field = key, sanitizer = name, "sanitizer removed field");
                        self.subject.shift_remove(key);
                    }
                }
            }
        }

        Ok(())
    }
}
