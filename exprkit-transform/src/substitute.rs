//! Placeholder substitution

use crate::error::{Result, TransformError};
use crate::transform::{rebuild, Transform};
use exprkit_core::{Expr, Value};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Placeholder index to replacement tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    slots: FxHashMap<u32, Expr>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `values` to placeholders `1..=n` in order
    pub fn positional<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        let slots = values
            .into_iter()
            .zip(1u32..)
            .map(|(value, index)| (index, value.into()))
            .collect();
        Self { slots }
    }

    /// Bind one placeholder, returning the previous binding
    pub fn bind(&mut self, index: u32, value: impl Into<Expr>) -> Option<Expr> {
        self.slots.insert(index, value.into())
    }

    /// Builder-style [`bind`](Self::bind)
    pub fn with(mut self, index: u32, value: impl Into<Expr>) -> Self {
        self.bind(index, value);
        self
    }

    pub fn get(&self, index: u32) -> Option<&Expr> {
        self.slots.get(&index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Replaces bound placeholders, shares everything else
#[derive(Debug, Clone, Copy)]
pub struct Substitute<'a> {
    bindings: &'a Bindings,
}

impl<'a> Substitute<'a> {
    pub fn new(bindings: &'a Bindings) -> Self {
        Self { bindings }
    }
}

impl Transform for Substitute<'_> {
    type Output = Expr;

    fn placeholder(&mut self, _expr: &Expr, index: u32) -> Result<Expr> {
        self.bindings
            .get(index)
            .cloned()
            .ok_or(TransformError::IndexOutOfRange {
                index,
                available: self.bindings.len(),
            })
    }

    fn terminal(&mut self, expr: &Expr, _value: &Value) -> Result<Expr> {
        Ok(expr.clone())
    }

    fn compound(&mut self, expr: &Expr) -> Result<Expr> {
        rebuild(expr, self)
    }
}

/// Replace every placeholder in `expr` with its binding
pub fn substitute(expr: &Expr, bindings: &Bindings) -> Result<Expr> {
    debug!(bindings = bindings.len(), "substituting placeholders");
    Substitute::new(bindings).transform(expr)
}

#[cfg(test)]
#[path = "substitute_tests.rs"]
mod tests;
