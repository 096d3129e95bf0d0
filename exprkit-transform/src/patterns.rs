//! Node patterns for rule dispatch

use exprkit_core::{BinaryOp, Expr, Kind, Node, TypeTag, UnaryOp};
use serde::{Deserialize, Serialize};

/// Pattern for matching expression nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    /// Match any node
    Any,

    /// Match any terminal
    AnyTerminal,

    /// Match a terminal whose payload has this runtime type
    Terminal(TypeTag),

    /// Match any compound node
    AnyCompound,

    /// Match any unary operator
    AnyUnary,

    /// Match any binary operator
    AnyBinary,

    /// Match a specific kind
    Kind(Kind),

    /// Match a specific kind with an exact child count
    KindArity(Kind, usize),

    /// Match one of several patterns
    Or(Vec<Pattern>),
}

impl Pattern {
    /// How well this pattern fits `expr`; `None` when it does not match.
    ///
    /// Higher scores are more specific. Payload type and kind+arity rank
    /// above kind, which ranks above operator family, then the generic
    /// terminal/compound patterns and finally `Any`.
    pub fn score(&self, expr: &Expr) -> Option<u8> {
        match (self, expr.node()) {
            (Pattern::Any, _) => Some(0),

            (Pattern::AnyTerminal, Node::Terminal(_)) => Some(1),
            (Pattern::Terminal(tag), Node::Terminal(value)) => {
                (value.type_tag() == *tag).then_some(4)
            }

            (Pattern::AnyCompound, Node::Compound { .. }) => Some(1),
            (Pattern::AnyUnary, Node::Compound { kind, .. }) => {
                matches!(kind, Kind::Unary(_)).then_some(2)
            }
            (Pattern::AnyBinary, Node::Compound { kind, .. }) => {
                matches!(kind, Kind::Binary(_)).then_some(2)
            }
            (Pattern::Kind(k), _) => (*k == expr.kind()).then_some(3),
            (Pattern::KindArity(k, n), _) => {
                (*k == expr.kind() && *n == expr.children().len()).then_some(4)
            }

            (Pattern::Or(patterns), _) => patterns.iter().filter_map(|p| p.score(expr)).max(),

            _ => None,
        }
    }

    pub fn matches(&self, expr: &Expr) -> bool {
        self.score(expr).is_some()
    }

    pub fn binary(op: BinaryOp) -> Pattern {
        Pattern::Kind(Kind::Binary(op))
    }

    pub fn unary(op: UnaryOp) -> Pattern {
        Pattern::Kind(Kind::Unary(op))
    }

    /// Call with exactly `args` arguments after the callee
    pub fn call_with(args: usize) -> Pattern {
        Pattern::KindArity(Kind::Call, args + 1)
    }

    pub fn terminal(tag: TypeTag) -> Pattern {
        Pattern::Terminal(tag)
    }

    pub fn or(patterns: Vec<Pattern>) -> Pattern {
        Pattern::Or(patterns)
    }
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;
