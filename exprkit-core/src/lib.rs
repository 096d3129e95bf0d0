//! Core types for exprkit
//!
//! This crate provides the data model shared by every exprkit component:
//! - Expression trees (`Expr`, `Node`, `Kind`)
//! - Terminal payloads (`Value`)
//! - The operator-driven builder
//! - Error types

pub mod ast;
pub mod builder;
pub mod error;
pub mod value;

pub use ast::{Arity, BinaryOp, Expr, Kind, Node, UnaryOp};
pub use error::{Error, Result};
pub use value::{Form, NativeFunction, TypeTag, Value, ValueError, ValueResult};
