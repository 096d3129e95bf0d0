//! Error types for exprkit

use crate::ast::{Arity, Kind};
use crate::value::ValueError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Arity mismatch for {kind}: expected {expected} children, got {got}")]
    ArityMismatch {
        kind: Kind,
        expected: Arity,
        got: usize,
    },

    #[error("Terminal nodes are built from a payload, not from children")]
    TerminalWithoutPayload,

    #[error("Value error: {0}")]
    Value(#[from] ValueError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
