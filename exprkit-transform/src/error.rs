//! Error types for transforms and evaluation

use exprkit_core::{Kind, ValueError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Dispatch failure: no handler matches a {kind} node")]
    DispatchFailure { kind: Kind },

    #[error("Placeholder index {index} out of range ({available} value(s) supplied)")]
    IndexOutOfRange { index: u32, available: usize },

    #[error("Type mismatch: cannot apply {op} to {operands}")]
    TypeMismatch { op: &'static str, operands: String },

    #[error("Not callable: {found}")]
    NotCallable { found: &'static str },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow in {op}")]
    ArithmeticOverflow { op: &'static str },

    #[error("Maximum transform depth of {limit} exceeded")]
    DepthExceeded { limit: usize },

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Core error: {0}")]
    Core(#[from] exprkit_core::Error),

    #[error("Value error: {0}")]
    Value(#[from] ValueError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TransformError {
    /// Type mismatch naming the offending operand types
    pub fn mismatch(op: &'static str, operands: &[&'static str]) -> Self {
        TransformError::TypeMismatch {
            op,
            operands: operands.join(" and "),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
