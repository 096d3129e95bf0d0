//! Folds over a tree

use crate::error::Result;
use crate::transform::Transform;
use exprkit_core::{Expr, Value};

/// Largest placeholder index seen
#[derive(Debug, Default)]
struct MaxPlaceholder;

impl Transform for MaxPlaceholder {
    type Output = u32;

    fn placeholder(&mut self, _expr: &Expr, index: u32) -> Result<u32> {
        Ok(index)
    }

    fn terminal(&mut self, _expr: &Expr, _value: &Value) -> Result<u32> {
        Ok(0)
    }

    fn compound(&mut self, expr: &Expr) -> Result<u32> {
        expr.children()
            .iter()
            .try_fold(0, |max, child| -> Result<u32> {
                Ok(max.max(self.transform(child)?))
            })
    }
}

/// Number of positional arguments `expr` expects: its largest placeholder
/// index, or 0 when it has none.
pub fn arity(expr: &Expr) -> Result<u32> {
    MaxPlaceholder.transform(expr)
}

#[derive(Debug, Default)]
struct Leaves {
    values: Vec<Value>,
}

impl Transform for Leaves {
    type Output = ();

    fn terminal(&mut self, _expr: &Expr, value: &Value) -> Result<()> {
        self.values.push(value.clone());
        Ok(())
    }

    fn compound(&mut self, expr: &Expr) -> Result<()> {
        for child in expr.children() {
            self.transform(child)?;
        }
        Ok(())
    }
}

/// Terminal payloads in left-to-right order
pub fn terminals(expr: &Expr) -> Result<Vec<Value>> {
    let mut leaves = Leaves::default();
    leaves.transform(expr)?;
    Ok(leaves.values)
}

#[cfg(test)]
#[path = "fold_tests.rs"]
mod tests;
