//! Transform engine for exprkit trees
//!
//! This crate provides:
//! - The `Transform` dispatch protocol and the `Identity` rebuild handler
//! - Pattern-keyed rule tables
//! - Placeholder substitution and tree folds
//! - The evaluator
//! - Tree printing

pub mod error;
pub mod eval;
pub mod fold;
pub mod patterns;
pub mod print;
pub mod rules;
pub mod substitute;
pub mod transform;

pub use error::{Result, TransformError};
pub use eval::{evaluate, evaluate_with, EvalOptions, Evaluator};
pub use fold::{arity, terminals};
pub use patterns::Pattern;
pub use print::{print_tree, PrintOptions, TreePrinter};
pub use rules::{Rule, RuleSet};
pub use substitute::{substitute, Bindings, Substitute};
pub use transform::{dispatch, rebuild, transform, Identity, Transform};
