//! Tree-walking evaluator
//!
//! [`Evaluator`] is an ordinary [`Transform`] producing [`Value`]s. Each hook
//! decides which children to visit, so `&&`, `||` and `if` only evaluate the
//! operands they need and side effects happen in visit order.

use crate::error::{Result, TransformError};
use crate::substitute::{substitute, Bindings};
use crate::transform::{dispatch, Transform};
use exprkit_core::{BinaryOp, Expr, Form, UnaryOp, Value, ValueError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Evaluator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Maximum nesting of nodes under evaluation.
    ///
    /// Evaluation recurses once per level on the calling thread's stack.
    /// Trees deeper than the default need a larger limit and a thread with
    /// enough stack for it.
    pub max_depth: usize,

    /// Report integer overflow instead of wrapping
    pub checked_arithmetic: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: 4096,
            checked_arithmetic: true,
        }
    }
}

/// Evaluates expression trees with positional placeholder arguments
#[derive(Debug, Default)]
pub struct Evaluator {
    options: EvalOptions,
    args: Vec<Value>,
    depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvalOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Values for placeholders `_1.._n`
    pub fn with_args(mut self, args: impl IntoIterator<Item = Value>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value> {
        self.transform(expr)
    }

    fn eval_if(&mut self, args: &[Expr]) -> Result<Value> {
        let [condition, then_branch, else_branch] = args else {
            return Err(ValueError::ArityMismatch {
                function: Form::If.to_string(),
                expected: 3,
                actual: args.len(),
            }
            .into());
        };
        if self.transform(condition)?.is_truthy() {
            self.transform(then_branch)
        } else {
            self.transform(else_branch)
        }
    }

    /// `for_each(range)[body]`: the body is evaluated once per element with
    /// the element bound to `_1`; the remaining placeholders keep their
    /// positional arguments.
    fn eval_for_each(&mut self, range: &Expr, body: &Expr) -> Result<Value> {
        let items = match self.transform(range)?.load() {
            Value::List(items) => items,
            other => return Err(TransformError::mismatch("for_each", &[other.type_name()])),
        };
        debug!(elements = items.len(), "for_each");

        let mut bindings = Bindings::positional(self.args.iter().cloned());
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            bindings.bind(1, item);
            let instance = substitute(body, &bindings)?;
            results.push(self.transform(&instance)?);
        }
        Ok(Value::List(results))
    }

    fn apply_binary(&self, op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
        let mismatch =
            || TransformError::mismatch(op.symbol(), &[left.type_name(), right.type_name()]);

        match op {
            BinaryOp::Equal => Ok(Value::Boolean(values_equal(left, right))),
            BinaryOp::NotEqual => Ok(Value::Boolean(!values_equal(left, right))),

            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                // unordered operands (NaN) make every ordering test false
                let ordering = match (left, right) {
                    (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                    (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
                    (a, b) if a.is_number() && b.is_number() => {
                        a.as_number()?.partial_cmp(&b.as_number()?)
                    }
                    _ => return Err(mismatch()),
                };
                Ok(Value::Boolean(ordering.map_or(false, |ordering| match op {
                    BinaryOp::Less => ordering == Ordering::Less,
                    BinaryOp::LessEqual => ordering != Ordering::Greater,
                    BinaryOp::Greater => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                })))
            }

            BinaryOp::Plus => match (left, right) {
                (Value::String(a), Value::String(b)) => {
                    Ok(Value::String(format!("{}{}", a, b)))
                }
                _ => self.arithmetic(op, left, right),
            },
            BinaryOp::Minus | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => {
                self.arithmetic(op, left, right)
            }

            BinaryOp::ShiftLeft | BinaryOp::ShiftRight => match (left, right) {
                (Value::Integer(a), Value::Integer(b)) => {
                    self.shift(op, *a, *b).map(Value::Integer)
                }
                _ => Err(mismatch()),
            },

            // only reached when both operands were already evaluated
            BinaryOp::LogicalAnd => Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
            BinaryOp::LogicalOr => Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
        }
    }

    fn arithmetic(&self, op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => {
                self.integer_arithmetic(op, *a, *b).map(Value::Integer)
            }
            (a, b) if a.is_number() && b.is_number() => {
                let (a, b) = (a.as_number()?, b.as_number()?);
                Ok(Value::Float(match op {
                    BinaryOp::Plus => a + b,
                    BinaryOp::Minus => a - b,
                    BinaryOp::Multiply => a * b,
                    BinaryOp::Divide => a / b,
                    _ => a % b,
                }))
            }
            _ => Err(TransformError::mismatch(
                op.symbol(),
                &[left.type_name(), right.type_name()],
            )),
        }
    }

    fn integer_arithmetic(&self, op: BinaryOp, a: i64, b: i64) -> Result<i64> {
        if b == 0 && matches!(op, BinaryOp::Divide | BinaryOp::Modulo) {
            return Err(TransformError::DivisionByZero);
        }

        if self.options.checked_arithmetic {
            let result = match op {
                BinaryOp::Plus => a.checked_add(b),
                BinaryOp::Minus => a.checked_sub(b),
                BinaryOp::Multiply => a.checked_mul(b),
                BinaryOp::Divide => a.checked_div(b),
                _ => a.checked_rem(b),
            };
            result.ok_or(TransformError::ArithmeticOverflow { op: op.symbol() })
        } else {
            Ok(match op {
                BinaryOp::Plus => a.wrapping_add(b),
                BinaryOp::Minus => a.wrapping_sub(b),
                BinaryOp::Multiply => a.wrapping_mul(b),
                BinaryOp::Divide => a.wrapping_div(b),
                _ => a.wrapping_rem(b),
            })
        }
    }

    fn shift(&self, op: BinaryOp, a: i64, b: i64) -> Result<i64> {
        let overflow = || TransformError::ArithmeticOverflow { op: op.symbol() };
        let amount = u32::try_from(b).map_err(|_| overflow())?;

        if self.options.checked_arithmetic {
            let result = match op {
                BinaryOp::ShiftLeft => a.checked_shl(amount),
                _ => a.checked_shr(amount),
            };
            result.ok_or_else(overflow)
        } else {
            Ok(match op {
                BinaryOp::ShiftLeft => a.wrapping_shl(amount),
                _ => a.wrapping_shr(amount),
            })
        }
    }
}

impl Transform for Evaluator {
    type Output = Value;

    fn transform(&mut self, expr: &Expr) -> Result<Value> {
        if self.depth >= self.options.max_depth {
            return Err(TransformError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = dispatch(self, expr);
        self.depth -= 1;
        result
    }

    fn placeholder(&mut self, _expr: &Expr, index: u32) -> Result<Value> {
        (index as usize)
            .checked_sub(1)
            .and_then(|slot| self.args.get(slot))
            .cloned()
            .ok_or(TransformError::IndexOutOfRange {
                index,
                available: self.args.len(),
            })
    }

    fn terminal(&mut self, _expr: &Expr, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    fn unary(&mut self, _expr: &Expr, op: UnaryOp, operand: &Expr) -> Result<Value> {
        let value = self.transform(operand)?.load();
        match (op, &value) {
            (UnaryOp::Negate, Value::Integer(n)) => {
                if self.options.checked_arithmetic {
                    n.checked_neg()
                        .map(Value::Integer)
                        .ok_or(TransformError::ArithmeticOverflow { op: op.symbol() })
                } else {
                    Ok(Value::Integer(n.wrapping_neg()))
                }
            }
            (UnaryOp::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
            (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            _ => Err(TransformError::mismatch(op.symbol(), &[value.type_name()])),
        }
    }

    fn binary(&mut self, _expr: &Expr, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value> {
        match op {
            BinaryOp::LogicalAnd => {
                if !self.transform(left)?.is_truthy() {
                    return Ok(Value::Boolean(false));
                }
                Ok(Value::Boolean(self.transform(right)?.is_truthy()))
            }
            BinaryOp::LogicalOr => {
                if self.transform(left)?.is_truthy() {
                    return Ok(Value::Boolean(true));
                }
                Ok(Value::Boolean(self.transform(right)?.is_truthy()))
            }
            _ => {
                let target = self.transform(left)?;
                let operand = self.transform(right)?.load();

                // stream insertion into a string cell
                if op == BinaryOp::ShiftLeft {
                    if let Value::String(mut text) = target.load() {
                        if target.is_ref() {
                            match &operand {
                                Value::String(s) => text.push_str(s),
                                other => text.push_str(&other.to_string()),
                            }
                            target.store(Value::String(text))?;
                            return Ok(target);
                        }
                    }
                }

                self.apply_binary(op, &target.load(), &operand)
            }
        }
    }

    fn call(&mut self, _expr: &Expr, callee: &Expr, args: &[Expr]) -> Result<Value> {
        match callee.value() {
            Some(Value::Form(Form::If)) => return self.eval_if(args),
            Some(Value::Form(Form::ForEach)) => {
                return Err(TransformError::NotCallable {
                    found: "for_each without a body",
                })
            }
            _ => {}
        }

        let function = match self.transform(callee)?.load() {
            Value::Function(function) => function,
            other => {
                return Err(TransformError::NotCallable {
                    found: other.type_name(),
                })
            }
        };
        let values = args
            .iter()
            .map(|arg| self.transform(arg))
            .collect::<Result<Vec<_>>>()?;

        debug!(function = %function.name, args = values.len(), "call");
        Ok(function.call(&values)?)
    }

    fn subscript(&mut self, _expr: &Expr, target: &Expr, index: &Expr) -> Result<Value> {
        if let Some(range) = for_each_range(target) {
            return self.eval_for_each(range, index);
        }

        let container = self.transform(target)?.load();
        let position = self.transform(index)?.load();
        let i = match position {
            Value::Integer(i) => i,
            other => {
                return Err(TransformError::mismatch(
                    "[]",
                    &[container.type_name(), other.type_name()],
                ))
            }
        };

        match &container {
            Value::List(items) => Ok(items[element(i, items.len())?].clone()),
            Value::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                Ok(Value::String(chars[element(i, chars.len())?].to_string()))
            }
            other => Err(TransformError::mismatch("[]", &[other.type_name(), "integer"])),
        }
    }

    fn assign(&mut self, _expr: &Expr, target: &Expr, value: &Expr) -> Result<Value> {
        let cell = self.transform(target)?;
        let value = self.transform(value)?.load();
        if !cell.is_ref() {
            return Err(TransformError::mismatch("=", &[cell.type_name(), value.type_name()]));
        }
        cell.store(value.clone())?;
        Ok(value)
    }

    fn comma(&mut self, _expr: &Expr, left: &Expr, right: &Expr) -> Result<Value> {
        self.transform(left)?;
        self.transform(right)
    }
}

/// Range of a `for_each(range)` head
fn for_each_range(target: &Expr) -> Option<&Expr> {
    match (target.callee()?.value()?, target.args()) {
        (Value::Form(Form::ForEach), [range]) => Some(range),
        _ => None,
    }
}

fn element(index: i64, length: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < length)
        .ok_or(TransformError::Value(ValueError::IndexOutOfBounds { index, length }))
}

/// IEEE equality with numeric promotion; references compare by identity
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (a, b) if a.is_number() && b.is_number() => {
            matches!((a.as_number(), b.as_number()), (Ok(x), Ok(y)) if x == y)
        }
        _ => left == right,
    }
}

/// Evaluate `expr` with `args` bound to placeholders `_1.._n`
pub fn evaluate(expr: &Expr, args: &[Value]) -> Result<Value> {
    evaluate_with(expr, args, EvalOptions::default())
}

pub fn evaluate_with(expr: &Expr, args: &[Value], options: EvalOptions) -> Result<Value> {
    debug!(args = args.len(), max_depth = options.max_depth, "evaluating expression");
    Evaluator::with_options(options)
        .with_args(args.iter().cloned())
        .eval(expr)
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;
