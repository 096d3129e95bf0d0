//! Transformer dispatch protocol
//!
//! A [`Transform`] is offered exactly one hook per node. Hooks receive the
//! node's raw, untransformed children and decide for themselves whether to
//! descend (by calling [`Transform::transform`] again), which makes
//! short-circuiting constructs possible. Nothing is traversed automatically.
//!
//! Hooks are tried from most to least specific:
//!
//! - terminals: `placeholder` -> `terminal`
//! - compounds: `unary` / `binary` / `call` / `subscript` / `assign` /
//!   `comma` -> `compound`
//!
//! The default `terminal` and `compound` report
//! [`TransformError::DispatchFailure`].

use crate::error::{Result, TransformError};
use exprkit_core::{BinaryOp, Expr, Kind, Node, UnaryOp, Value};
use tracing::trace;

/// Handler applied to an expression tree
pub trait Transform {
    /// What the handler produces: a new tree, a value, an accumulator...
    type Output;

    /// Dispatch `expr` to the most specific hook this handler provides.
    ///
    /// Handlers that wrap every step (depth limits, memoisation) override
    /// this and call [`dispatch`] themselves.
    fn transform(&mut self, expr: &Expr) -> Result<Self::Output> {
        dispatch(self, expr)
    }

    /// Terminal holding a placeholder
    fn placeholder(&mut self, expr: &Expr, index: u32) -> Result<Self::Output> {
        self.terminal(expr, &Value::Placeholder(index))
    }

    /// Any terminal not claimed by a more specific hook
    fn terminal(&mut self, _expr: &Expr, _value: &Value) -> Result<Self::Output> {
        Err(TransformError::DispatchFailure {
            kind: Kind::Terminal,
        })
    }

    fn unary(&mut self, expr: &Expr, _op: UnaryOp, _operand: &Expr) -> Result<Self::Output> {
        self.compound(expr)
    }

    fn binary(
        &mut self,
        expr: &Expr,
        _op: BinaryOp,
        _left: &Expr,
        _right: &Expr,
    ) -> Result<Self::Output> {
        self.compound(expr)
    }

    /// `args` excludes the callee; its length is the call's argument count
    fn call(&mut self, expr: &Expr, _callee: &Expr, _args: &[Expr]) -> Result<Self::Output> {
        self.compound(expr)
    }

    fn subscript(&mut self, expr: &Expr, _target: &Expr, _index: &Expr) -> Result<Self::Output> {
        self.compound(expr)
    }

    fn assign(&mut self, expr: &Expr, _target: &Expr, _value: &Expr) -> Result<Self::Output> {
        self.compound(expr)
    }

    fn comma(&mut self, expr: &Expr, _left: &Expr, _right: &Expr) -> Result<Self::Output> {
        self.compound(expr)
    }

    /// Any compound node not claimed by a more specific hook
    fn compound(&mut self, expr: &Expr) -> Result<Self::Output> {
        Err(TransformError::DispatchFailure { kind: expr.kind() })
    }
}

/// Route `expr` to exactly one hook of `handler`
pub fn dispatch<T: Transform + ?Sized>(handler: &mut T, expr: &Expr) -> Result<T::Output> {
    trace!(kind = %expr.kind(), "transform");
    match expr.node() {
        Node::Terminal(Value::Placeholder(index)) => handler.placeholder(expr, *index),
        Node::Terminal(value) => handler.terminal(expr, value),
        Node::Compound { kind, children } => match *kind {
            Kind::Unary(op) => handler.unary(expr, op, &children[0]),
            Kind::Binary(op) => handler.binary(expr, op, &children[0], &children[1]),
            Kind::Call => handler.call(expr, &children[0], &children[1..]),
            Kind::Subscript => handler.subscript(expr, &children[0], &children[1]),
            Kind::Assign => handler.assign(expr, &children[0], &children[1]),
            Kind::Comma => handler.comma(expr, &children[0], &children[1]),
            Kind::Terminal => handler.compound(expr),
        },
    }
}

/// Apply `handler` to `expr`
pub fn transform<T: Transform + ?Sized>(expr: &Expr, handler: &mut T) -> Result<T::Output> {
    handler.transform(expr)
}

/// Transform every child of `expr` and reassemble a node of the same kind.
///
/// When no child changes the original node is returned, so untouched
/// subtrees stay shared with the input.
pub fn rebuild<T>(expr: &Expr, handler: &mut T) -> Result<Expr>
where
    T: Transform<Output = Expr> + ?Sized,
{
    let children = expr.children();
    if children.is_empty() {
        return Ok(expr.clone());
    }

    let mut changed = false;
    let mut rebuilt = Vec::with_capacity(children.len());
    for child in children {
        let new_child = handler.transform(child)?;
        changed |= !Expr::ptr_eq(child, &new_child);
        rebuilt.push(new_child);
    }

    if !changed {
        return Ok(expr.clone());
    }
    Ok(expr.with_children(rebuilt)?)
}

/// Returns every node unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Transform for Identity {
    type Output = Expr;

    fn terminal(&mut self, expr: &Expr, _value: &Value) -> Result<Expr> {
        Ok(expr.clone())
    }

    fn compound(&mut self, expr: &Expr) -> Result<Expr> {
        rebuild(expr, self)
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
