//! Expression tree representation
//!
//! An [`Expr`] is a cheap-to-clone handle to an immutable [`Node`]. Trees are
//! never mutated in place; rewriting produces new nodes and reuses every
//! subtree that did not change.

use crate::error::{Error, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    ShiftLeft,
    ShiftRight,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
                | BinaryOp::Equal
                | BinaryOp::NotEqual
        )
    }
}

/// Closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Terminal,
    Unary(UnaryOp),
    Binary(BinaryOp),
    Call,
    Subscript,
    Assign,
    Comma,
}

impl Kind {
    /// Number of children a node of this kind must have
    pub fn arity(&self) -> Arity {
        match self {
            Kind::Terminal => Arity::Exact(0),
            Kind::Unary(_) => Arity::Exact(1),
            Kind::Binary(_) | Kind::Subscript | Kind::Assign | Kind::Comma => Arity::Exact(2),
            // callee followed by any number of arguments
            Kind::Call => Arity::AtLeast(1),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Terminal => write!(f, "term"),
            Kind::Unary(op) => write!(f, "{}", op.symbol()),
            Kind::Binary(op) => write!(f, "{}", op.symbol()),
            Kind::Call => write!(f, "()"),
            Kind::Subscript => write!(f, "[]"),
            Kind::Assign => write!(f, "="),
            Kind::Comma => write!(f, ","),
        }
    }
}

/// Expected child count of a [`Kind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// A tree element: a leaf payload or an operation over children
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Terminal(Value),
    Compound { kind: Kind, children: Vec<Expr> },
}

/// Immutable, structurally shared expression tree
#[derive(Clone)]
pub struct Expr(Arc<Node>);

impl Expr {
    /// Build a compound node, checking the child count against `kind`
    pub fn new(kind: Kind, children: Vec<Expr>) -> Result<Expr> {
        if kind == Kind::Terminal {
            return Err(Error::TerminalWithoutPayload);
        }
        let expected = kind.arity();
        if !expected.accepts(children.len()) {
            return Err(Error::ArityMismatch {
                kind,
                expected,
                got: children.len(),
            });
        }
        Ok(Self::compound(kind, children))
    }

    /// Wrap a payload as a terminal
    pub fn terminal(value: impl Into<Value>) -> Expr {
        Expr(Arc::new(Node::Terminal(value.into())))
    }

    /// Callers guarantee the arity invariant
    pub(crate) fn compound(kind: Kind, children: Vec<Expr>) -> Expr {
        debug_assert!(kind != Kind::Terminal && kind.arity().accepts(children.len()));
        Expr(Arc::new(Node::Compound { kind, children }))
    }

    /// Same kind, new children
    pub fn with_children(&self, children: Vec<Expr>) -> Result<Expr> {
        Expr::new(self.kind(), children)
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn kind(&self) -> Kind {
        match self.node() {
            Node::Terminal(_) => Kind::Terminal,
            Node::Compound { kind, .. } => *kind,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.node(), Node::Terminal(_))
    }

    /// Children in order; empty for terminals
    pub fn children(&self) -> &[Expr] {
        match self.node() {
            Node::Terminal(_) => &[],
            Node::Compound { children, .. } => children,
        }
    }

    pub fn child(&self, index: usize) -> Option<&Expr> {
        self.children().get(index)
    }

    /// Payload of a terminal
    pub fn value(&self) -> Option<&Value> {
        match self.node() {
            Node::Terminal(value) => Some(value),
            Node::Compound { .. } => None,
        }
    }

    pub fn as_placeholder(&self) -> Option<u32> {
        self.value().and_then(Value::as_placeholder)
    }

    /// First operand of a two-child node
    pub fn left(&self) -> Option<&Expr> {
        match self.kind().arity() {
            Arity::Exact(2) => self.child(0),
            _ => None,
        }
    }

    /// Second operand of a two-child node
    pub fn right(&self) -> Option<&Expr> {
        match self.kind().arity() {
            Arity::Exact(2) => self.child(1),
            _ => None,
        }
    }

    /// Callee of a call node
    pub fn callee(&self) -> Option<&Expr> {
        match self.kind() {
            Kind::Call => self.child(0),
            _ => None,
        }
    }

    /// Arguments of a call node
    pub fn args(&self) -> &[Expr] {
        match self.kind() {
            Kind::Call => &self.children()[1..],
            _ => &[],
        }
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(a: &Expr, b: &Expr) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Height of the tree; a terminal has depth 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((expr, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(expr.children().iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Number of terminals in the tree
    pub fn leaf_count(&self) -> usize {
        let mut leaves = 0;
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            match expr.node() {
                Node::Terminal(_) => leaves += 1,
                Node::Compound { children, .. } => pending.extend(children),
            }
        }
        leaves
    }
}

/// Uniquely owned subtrees are released from an explicit stack, so dropping
/// a long chain does not recurse once per level.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        if let Some(Node::Compound { children, .. }) = Arc::get_mut(&mut self.0) {
            pending.append(children);
        }
        while let Some(mut expr) = pending.pop() {
            if let Some(Node::Compound { children, .. }) = Arc::get_mut(&mut expr.0) {
                pending.append(children);
            }
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        Expr::ptr_eq(self, other) || self.node() == other.node()
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node().fmt(f)
    }
}

/// Fully parenthesised infix rendering.
///
/// Recurses once per level, unlike `depth`, `leaf_count` and drop.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children = self.children();
        match self.kind() {
            Kind::Terminal => match self.value() {
                Some(value) => write!(f, "{}", value),
                None => Ok(()),
            },
            Kind::Unary(op) => write!(f, "{}{}", op.symbol(), children[0]),
            Kind::Binary(op) => {
                write!(f, "({} {} {})", children[0], op.symbol(), children[1])
            }
            Kind::Call => {
                write!(f, "{}(", children[0])?;
                for (i, arg) in children[1..].iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Kind::Subscript => write!(f, "{}[{}]", children[0], children[1]),
            Kind::Assign => write!(f, "({} = {})", children[0], children[1]),
            Kind::Comma => write!(f, "({}, {})", children[0], children[1]),
        }
    }
}

#[cfg(test)]
#[path = "ast_tests.rs"]
mod tests;
