//! Operator-driven expression construction
//!
//! Every entry point here is purely structural: nothing is evaluated and raw
//! values are promoted to terminals on the way in. The overloaded operators
//! inherit Rust's own precedence and associativity, so `a + b * c` nests the
//! product under the sum and `a - b - c` is left-associated.

use crate::ast::{BinaryOp, Expr, Kind, UnaryOp};
use crate::value::{Form, NativeFunction, Value, ValueResult};
use std::ops;

/// Wrap a raw value as a terminal
pub fn terminal(value: impl Into<Value>) -> Expr {
    Expr::terminal(value)
}

/// Placeholder terminal, 1-based
pub fn placeholder(index: u32) -> Expr {
    Expr::terminal(Value::Placeholder(index))
}

/// Identifier terminal
pub fn symbol(name: impl Into<String>) -> Expr {
    Expr::terminal(Value::Symbol(name.into()))
}

/// Terminal holding a fresh reference cell
pub fn reference(initial: impl Into<Value>) -> Expr {
    Expr::terminal(Value::new_ref(initial.into()))
}

/// Terminal holding a host function
pub fn function<F>(name: impl Into<String>, arity: Option<usize>, f: F) -> Expr
where
    F: Fn(&[Value]) -> ValueResult<Value> + Send + Sync + 'static,
{
    Expr::terminal(NativeFunction::new(name, arity, f))
}

pub fn combine(op: BinaryOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::compound(Kind::Binary(op), vec![left.into(), right.into()])
}

pub fn unary(op: UnaryOp, operand: impl Into<Expr>) -> Expr {
    Expr::compound(Kind::Unary(op), vec![operand.into()])
}

/// Call node: the callee is the first child, arguments follow
pub fn call<I>(callee: impl Into<Expr>, args: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    let mut children = vec![callee.into()];
    children.extend(args.into_iter().map(Into::into));
    Expr::compound(Kind::Call, children)
}

pub fn subscript(target: impl Into<Expr>, index: impl Into<Expr>) -> Expr {
    Expr::compound(Kind::Subscript, vec![target.into(), index.into()])
}

pub fn assign(target: impl Into<Expr>, value: impl Into<Expr>) -> Expr {
    Expr::compound(Kind::Assign, vec![target.into(), value.into()])
}

/// Sequencing: `left` then `right`
pub fn comma(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::compound(Kind::Comma, vec![left.into(), right.into()])
}

pub fn if_then_else(
    condition: impl Into<Expr>,
    then_branch: impl Into<Expr>,
    else_branch: impl Into<Expr>,
) -> Expr {
    call(
        Form::If,
        [condition.into(), then_branch.into(), else_branch.into()],
    )
}

/// Loop head; subscript the result with a body using placeholder `1`
pub fn for_each(range: impl Into<Expr>) -> Expr {
    call(Form::ForEach, [range.into()])
}

impl Expr {
    pub fn lt(&self, rhs: impl Into<Expr>) -> Expr {
        combine(BinaryOp::Less, self.clone(), rhs)
    }

    pub fn le(&self, rhs: impl Into<Expr>) -> Expr {
        combine(BinaryOp::LessEqual, self.clone(), rhs)
    }

    pub fn gt(&self, rhs: impl Into<Expr>) -> Expr {
        combine(BinaryOp::Greater, self.clone(), rhs)
    }

    pub fn ge(&self, rhs: impl Into<Expr>) -> Expr {
        combine(BinaryOp::GreaterEqual, self.clone(), rhs)
    }

    pub fn equals(&self, rhs: impl Into<Expr>) -> Expr {
        combine(BinaryOp::Equal, self.clone(), rhs)
    }

    pub fn not_equals(&self, rhs: impl Into<Expr>) -> Expr {
        combine(BinaryOp::NotEqual, self.clone(), rhs)
    }

    pub fn and(&self, rhs: impl Into<Expr>) -> Expr {
        combine(BinaryOp::LogicalAnd, self.clone(), rhs)
    }

    pub fn or(&self, rhs: impl Into<Expr>) -> Expr {
        combine(BinaryOp::LogicalOr, self.clone(), rhs)
    }

    pub fn call<I>(&self, args: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        call(self.clone(), args)
    }

    pub fn subscript(&self, index: impl Into<Expr>) -> Expr {
        subscript(self.clone(), index)
    }

    pub fn assign(&self, value: impl Into<Expr>) -> Expr {
        assign(self.clone(), value)
    }

    pub fn comma(&self, rhs: impl Into<Expr>) -> Expr {
        comma(self.clone(), rhs)
    }
}

macro_rules! impl_from_for_expr {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Expr::terminal(v)
                }
            }
        )*
    };
}

impl_from_for_expr!(i64, i32, u32, f64, f32, bool, &str, String, Value, NativeFunction, Form, Vec<Value>);

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

macro_rules! impl_binary_operator {
    (@raw $trait:ident, $method:ident => $op:ident; $($raw:ty),*) => {
        $(
            impl ops::$trait<Expr> for $raw {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    combine(BinaryOp::$op, self, rhs)
                }
            }

            impl ops::$trait<&Expr> for $raw {
                type Output = Expr;

                fn $method(self, rhs: &Expr) -> Expr {
                    combine(BinaryOp::$op, self, rhs.clone())
                }
            }
        )*
    };
    ($($trait:ident, $method:ident => $op:ident;)*) => {
        $(
            impl<R: Into<Expr>> ops::$trait<R> for Expr {
                type Output = Expr;

                fn $method(self, rhs: R) -> Expr {
                    combine(BinaryOp::$op, self, rhs)
                }
            }

            impl<R: Into<Expr>> ops::$trait<R> for &Expr {
                type Output = Expr;

                fn $method(self, rhs: R) -> Expr {
                    combine(BinaryOp::$op, self.clone(), rhs)
                }
            }

            impl_binary_operator!(@raw $trait, $method => $op; i64, f64);
        )*
    };
}

impl_binary_operator! {
    Add, add => Plus;
    Sub, sub => Minus;
    Mul, mul => Multiply;
    Div, div => Divide;
    Rem, rem => Modulo;
    Shl, shl => ShiftLeft;
    Shr, shr => ShiftRight;
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        unary(UnaryOp::Negate, self)
    }
}

impl ops::Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        unary(UnaryOp::Negate, self.clone())
    }
}

impl ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        unary(UnaryOp::Not, self)
    }
}

impl ops::Not for &Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        unary(UnaryOp::Not, self.clone())
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
