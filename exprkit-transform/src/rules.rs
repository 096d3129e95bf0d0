//! Runtime rule tables
//!
//! A [`RuleSet`] is the table-driven counterpart of implementing
//! [`Transform`] by hand: rules are registered against [`Pattern`]s and the
//! most specific matching rule handles each node. Rules recurse by calling
//! back into the set they are given.

use crate::error::{Result, TransformError};
use crate::patterns::Pattern;
use crate::transform::Transform;
use exprkit_core::{Expr, Value};
use tracing::{debug, trace};

/// A rule body. It receives the owning set so it can recurse.
pub type RuleFn<O> = Box<dyn Fn(&RuleSet<O>, &Expr) -> Result<O>>;

/// A registered rule
pub struct Rule<O> {
    /// Name of the rule, for diagnostics
    pub name: String,
    /// Pattern to match
    pub pattern: Pattern,
    body: RuleFn<O>,
}

/// Rules keyed by pattern, most specific match wins
pub struct RuleSet<O> {
    rules: Vec<Rule<O>>,
}

impl<O> Default for RuleSet<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> RuleSet<O> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule
    pub fn register<F>(&mut self, name: impl Into<String>, pattern: Pattern, body: F)
    where
        F: Fn(&RuleSet<O>, &Expr) -> Result<O> + 'static,
    {
        let name = name.into();
        debug!(rule = %name, ?pattern, "registered rule");
        self.rules.push(Rule {
            name,
            pattern,
            body: Box::new(body),
        });
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_rule<F>(mut self, name: impl Into<String>, pattern: Pattern, body: F) -> Self
    where
        F: Fn(&RuleSet<O>, &Expr) -> Result<O> + 'static,
    {
        self.register(name, pattern, body);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rule that would handle `expr`. Ties go to the earliest registration.
    pub fn select(&self, expr: &Expr) -> Option<&Rule<O>> {
        self.rules
            .iter()
            .rev()
            .filter_map(|rule| rule.pattern.score(expr).map(|score| (score, rule)))
            .max_by_key(|(score, _)| *score)
            .map(|(_, rule)| rule)
    }

    /// Apply the best matching rule to `expr`
    pub fn apply(&self, expr: &Expr) -> Result<O> {
        match self.select(expr) {
            Some(rule) => {
                trace!(rule = %rule.name, kind = %expr.kind(), "rule matched");
                (rule.body)(self, expr)
            }
            None => Err(TransformError::DispatchFailure { kind: expr.kind() }),
        }
    }
}

impl<O> Transform for RuleSet<O> {
    type Output = O;

    fn transform(&mut self, expr: &Expr) -> Result<O> {
        self.apply(expr)
    }

    fn terminal(&mut self, expr: &Expr, _value: &Value) -> Result<O> {
        self.apply(expr)
    }

    fn compound(&mut self, expr: &Expr) -> Result<O> {
        self.apply(expr)
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
